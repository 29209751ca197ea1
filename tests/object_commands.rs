use crate::common::command::{repository_dir, run_twig_command, stdout_of};
use crate::common::file::write_generated_files;
use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathAssert, PathChild};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use twig::areas::repository::Repository;
use twig::artifacts::objects::object_type::ObjectType;
use twig::commands::plumbing::cat_file::CatFileMode;
use twig::errors::TwigError;

mod common;

#[fixture]
fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir
}

#[rstest]
fn hash_object_prints_well_known_digest(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    init_repository_dir.child("hello.txt").write_str("hello\n")?;

    run_twig_command(init_repository_dir.path(), &["hash-object", "hello.txt"])
        .assert()
        .success()
        .stdout("ce013625030ba8dba906f756967f9e9ca394464a\n");

    // without -w nothing is stored
    init_repository_dir
        .child(".git/objects/ce/013625030ba8dba906f756967f9e9ca394464a")
        .assert(predicate::path::missing());

    Ok(())
}

#[rstest]
fn hash_object_writes_blob_object_successfully(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = write_generated_files(init_repository_dir.path(), 1);
    let file = &files[0];

    let oid = stdout_of(&mut run_twig_command(
        init_repository_dir.path(),
        &["hash-object", "-w", &file.name()],
    ));
    let oid = oid.trim_end();
    assert!(regex::Regex::new(r"^[0-9a-f]{40}$")?.is_match(oid));

    init_repository_dir
        .child(format!(".git/objects/{}/{}", &oid[..2], &oid[2..]))
        .assert(predicate::path::is_file());

    let content = stdout_of(&mut run_twig_command(
        init_repository_dir.path(),
        &["cat-file", "-p", &oid[..7]],
    ));
    assert_eq!(content, file.content);

    run_twig_command(init_repository_dir.path(), &["cat-file", "-t", oid])
        .assert()
        .success()
        .stdout("blob\n");
    run_twig_command(init_repository_dir.path(), &["cat-file", "-s", oid])
        .assert()
        .success()
        .stdout(format!("{}\n", file.content.len()));
    run_twig_command(init_repository_dir.path(), &["cat-file", "blob", oid])
        .assert()
        .success()
        .stdout(file.content.clone());

    Ok(())
}

#[rstest]
fn cat_file_with_wrong_type_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    init_repository_dir.child("hello.txt").write_str("hello\n")?;
    run_twig_command(init_repository_dir.path(), &["hash-object", "-w", "hello.txt"])
        .assert()
        .success();

    run_twig_command(init_repository_dir.path(), &["cat-file", "tree", "ce0136"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected object type tree, got blob"));

    Ok(())
}

#[rstest]
#[tokio::test]
async fn cat_file_reports_prefix_errors(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository = Repository::init(repository_dir.path()).await?;

    let err = repository
        .cat_file("c", CatFileMode::Type)
        .expect_err("single character prefix");
    assert_eq!(
        err.downcast_ref::<TwigError>(),
        Some(&TwigError::PrefixTooShort("c".to_string()))
    );

    let err = repository
        .cat_file("ce0136", CatFileMode::Pretty)
        .expect_err("nothing stored yet");
    assert!(matches!(
        err.downcast_ref::<TwigError>(),
        Some(TwigError::NotFound(_))
    ));

    repository_dir.child("hello.txt").write_str("hello\n")?;
    let oid = repository.hash_object(
        &repository_dir.path().join("hello.txt"),
        ObjectType::Blob,
        true,
    )?;
    let size = repository.cat_file(&oid.to_string().to_uppercase()[..6], CatFileMode::Size)?;
    assert_eq!(&size[..], b"6\n");

    Ok(())
}
