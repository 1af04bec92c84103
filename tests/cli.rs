use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[test]
fn build_from_project_subdirectory_outputs_pages() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("postpages.yaml"), "")?;
    let posts = dir.path().join("content").join("posts");
    fs::create_dir_all(posts.join("2023"))?;
    fs::write(posts.join("2023").join("hello.md"), "# Hello\n")?;

    // No project argument: the search starts at `.`
    let output = Command::cargo_bin("postpages")?
        .current_dir(&posts)
        .args(["--format", "json"])
        .output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let pages: Value = serde_json::from_slice(&output.stdout)?;
    let pages = pages.as_array().expect("a list of pages");
    let paths: Vec<&str> = pages.iter().filter_map(|p| p["path"].as_str()).collect();
    assert_eq!(vec!["/posts/2023/hello/", "/using-dsg"], paths);
    assert_eq!(
        Some("/posts/2023/hello/"),
        pages[0]["context"]["slug"].as_str()
    );
    assert_eq!(Some(true), pages[1]["defer"].as_bool());
    Ok(())
}

#[test]
fn build_fails_without_project_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    Command::cargo_bin("postpages")?
        .arg(dir.path().join("missing"))
        .assert()
        .failure();
    Ok(())
}
