use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const HAMLET: &str = "Who's there?
Nay, answer me: stand, and unfold yourself.
Long live the king!
Bernardo?
He.
You come most carefully upon your hour.
'Tis now struck twelve; get thee to bed, Francisco.
For this relief much thanks: 'tis bitter cold,
And I am sick at heart.
";

fn round_trip(extra_args: &[&str]) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("hamlet.txt");
    let cmp_path = temp_dir.path().join("hamlet.lz77");
    let out_path = temp_dir.path().join("hamlet_expanded.txt");
    std::fs::write(&in_path,HAMLET)?;
    Command::cargo_bin("lz77kit")?
        .arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&cmp_path)
        .args(extra_args)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("compressed {} into",HAMLET.len())));
    Command::cargo_bin("lz77kit")?
        .arg("expand")
        .arg("-i").arg(&cmp_path)
        .arg("-o").arg(&out_path)
        .args(extra_args)
        .assert()
        .success();
    match (std::fs::read(&cmp_path),std::fs::read(&out_path)) {
        (Ok(v1),Ok(v2)) => {
            assert_eq!(v1.len() % 6,0);
            assert_eq!(v2,HAMLET.as_bytes());
        },
        _ => panic!("unable to compare output with reference")
    }
    Ok(())
}

#[test]
fn compress_then_expand() -> STDRESULT {
    round_trip(&[])
}

#[test]
fn compress_then_expand_small_window() -> STDRESULT {
    round_trip(&["-n","8","-w","64"])
}

#[test]
fn run_both_directions() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("hamlet.txt");
    let cmp_path = temp_dir.path().join("hamlet.lz77");
    let out_path = temp_dir.path().join("hamlet_expanded.txt");
    std::fs::write(&in_path,HAMLET)?;
    Command::cargo_bin("lz77kit")?
        .arg("run")
        .arg("-i").arg(&in_path)
        .arg("-e").arg(&cmp_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("compressed {} into",HAMLET.len()))
            .and(predicate::str::contains(format!("into {}\n",HAMLET.len()))));
    assert_eq!(std::fs::read(&out_path)?,HAMLET.as_bytes());
    Ok(())
}

#[test]
fn run_reports_missing_input() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    Command::cargo_bin("lz77kit")?
        .arg("run")
        .arg("-i").arg(temp_dir.path().join("nothing.txt"))
        .arg("-e").arg(temp_dir.path().join("nothing.lz77"))
        .arg("-o").arg(temp_dir.path().join("nothing.out"))
        .assert()
        .success()
        .stderr(predicate::str::contains("unable to open"));
    Ok(())
}

#[test]
fn truncated_input_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let cmp_path = temp_dir.path().join("broken.lz77");
    let out_path = temp_dir.path().join("broken.txt");
    std::fs::write(&cmp_path,[0,0,0,0,0x41,0,1,0])?;
    Command::cargo_bin("lz77kit")?
        .arg("expand")
        .arg("-i").arg(&cmp_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("DecodeTruncatedStream"));
    Ok(())
}

#[test]
fn overwrite_drops_stale_bytes() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("hamlet.txt");
    let cmp_path = temp_dir.path().join("hamlet.lz77");
    std::fs::write(&in_path,HAMLET)?;
    std::fs::write(&cmp_path,vec![0xAA;100000])?;
    assert_cmd::Command::cargo_bin("lz77kit")?
        .arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&cmp_path)
        .write_stdin("y\n")
        .assert()
        .success();
    let compressed = std::fs::read(&cmp_path)?;
    assert!(compressed.len() < 100000);
    assert_eq!(compressed.len() % 6,0);
    assert_eq!(lz77kit::lz77::expand_slice(&compressed,&lz77kit::lz77::STD_OPTIONS)?,HAMLET.as_bytes());
    Ok(())
}
