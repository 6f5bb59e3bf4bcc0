//! Filesystem side: output staging, digest job, directory/metadata helpers, config layers, prompt.

use batchpipe::engine::tools::{canonicalize_roots, output_path_for};
use batchpipe::engine::{
    Cli, apply_cli_to_opts, digest_hex, digest_pairs, digest_tree, existing_outputs, hash_file,
    pending_count, run_digest,
};
use batchpipe::pipeline::{Kwargs, create_analysis_pipeline, stage_outputs};
use batchpipe::utils::batchpipe_toml::{apply_file_to_opts, parse_batchpipe_toml};
use batchpipe::utils::{Child, Directory, metadata, parse_bool_flag, yes_no_question};
use batchpipe::{Opts, PipelineParams, RunSummary};
use clap::Parser;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Input tree with three files (one nested) and an empty output dir, both canonicalized.
fn tree() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in");
    write(&input.join("a.txt"), "alpha");
    write(&input.join("b.txt"), "beta");
    write(&input.join("sub/c.txt"), "gamma");
    let (input, output) = canonicalize_roots(&input, &tmp.path().join("out")).unwrap();
    (tmp, input, output)
}

// --- output staging ---

#[test]
fn test_stage_outputs_skips_existing_unless_overwrite() {
    let tmp = TempDir::new().unwrap();
    let existing = tmp.path().join("done.out");
    write(&existing, "x");
    let pairs = vec![
        (PathBuf::from("a"), existing.clone()),
        (PathBuf::from("b"), tmp.path().join("new.out")),
    ];

    let (items, skipped) = stage_outputs(pairs.clone(), false);
    assert_eq!(skipped, 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].input, PathBuf::from("b"));

    let (items, skipped) = stage_outputs(pairs, true);
    assert_eq!(skipped, 0);
    assert_eq!(items.len(), 2);
}

#[test]
fn test_analysis_pipeline_reads_transforms_writes() {
    let (_tmp, input, output) = tree();
    let out_root = output.clone();
    let mut pipeline = create_analysis_pipeline(
        move |root: PathBuf, _: &Kwargs| {
            Ok(Directory::new(&root)
                .walk_files(false)
                .into_iter()
                .filter_map(|p| {
                    let out = output_path_for(&p, &root, &out_root, "upper")?;
                    Some((p, out))
                })
                .collect::<Vec<_>>())
        },
        |path: PathBuf, _: &Kwargs| Ok(fs::read_to_string(path)?),
        |text: String, _: &Kwargs| Ok(text.to_uppercase()),
        |out: &Path, text: String, _: &Kwargs| metadata::write_text(out, &text),
    )
    .with_params(PipelineParams::DEFAULT.with_n_cores(2));

    let summary = pipeline.call(input).unwrap();
    assert_eq!(summary.processed, 3);
    assert_eq!(
        metadata::read_text(&output.join("sub/c.txt.upper")).unwrap(),
        "GAMMA"
    );
}

// --- digest job ---

#[test]
fn test_digest_tree_mirrors_input() {
    let (_tmp, input, output) = tree();
    let params = PipelineParams::DEFAULT.with_n_cores(3);
    let summary = digest_tree(&input, &output, "b3", false, params).unwrap();

    assert_eq!(summary.enqueued, 3);
    assert_eq!(summary.processed, 3);
    let expected = blake3::hash(b"beta").to_hex().to_string();
    assert_eq!(metadata::read_text(&output.join("b.txt.b3")).unwrap(), expected);
    assert!(output.join("sub/c.txt.b3").is_file());
}

#[test]
fn test_digest_tree_respects_overwrite() {
    let (_tmp, input, output) = tree();
    write(&output.join("a.txt.b3"), "stale");

    let summary = digest_tree(&input, &output, "b3", false, PipelineParams::serial()).unwrap();
    assert_eq!(summary.enqueued, 2);
    assert_eq!(metadata::read_text(&output.join("a.txt.b3")).unwrap(), "stale");

    let params = PipelineParams::serial().with_overwrite(true);
    let summary = digest_tree(&input, &output, "b3", false, params).unwrap();
    assert_eq!(summary.enqueued, 3);
    assert_ne!(metadata::read_text(&output.join("a.txt.b3")).unwrap(), "stale");
}

#[test]
fn test_digest_pairs_skip_nested_output_root() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("root");
    write(&root.join("x.bin"), "x");
    let (input, output) = canonicalize_roots(&root, &root.join("digests")).unwrap();
    write(&output.join("x.bin.b3"), "old");

    let pairs = digest_pairs(&input, &output, "b3", false);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].1, output.join("x.bin.b3"));
    assert_eq!(existing_outputs(&pairs), 1);
}

#[test]
fn test_one_walk_sizes_bar_and_run() {
    let (_tmp, input, output) = tree();
    write(&output.join("a.txt.b3"), "stale");
    let pairs = digest_pairs(&input, &output, "b3", false);

    let pending = pending_count(&pairs, false);
    assert_eq!(pending, 2);
    assert_eq!(pending_count(&pairs, true), 3);

    let summary = run_digest(pairs, PipelineParams::DEFAULT.with_n_cores(2), None).unwrap();
    assert_eq!(summary.enqueued, pending);
    assert_eq!(summary.processed, pending);
}

#[cfg(unix)]
#[test]
fn test_follow_links_reaches_linked_files() {
    let tmp = TempDir::new().unwrap();
    let elsewhere = tmp.path().join("elsewhere");
    write(&elsewhere.join("linked.txt"), "linked");
    let root = tmp.path().join("in");
    write(&root.join("own.txt"), "own");
    std::os::unix::fs::symlink(&elsewhere, root.join("link")).unwrap();
    let (input, output) = canonicalize_roots(&root, &tmp.path().join("out")).unwrap();

    assert_eq!(digest_pairs(&input, &output, "b3", false).len(), 1);
    let followed = digest_pairs(&input, &output, "b3", true);
    assert_eq!(followed.len(), 2);
    assert_eq!(pending_count(&followed, false), 2);

    let summary = digest_tree(&input, &output, "b3", true, PipelineParams::serial()).unwrap();
    assert_eq!(summary.processed, 2);
    assert!(output.join("link/linked.txt.b3").is_file());
}

#[test]
fn test_hash_file_matches_blake3() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("f");
    write(&path, "hello world");
    let digest = hash_file(&path, 11).unwrap();
    assert_eq!(digest_hex(&digest), blake3::hash(b"hello world").to_hex().to_string());
}

#[test]
fn test_output_path_for_outside_root_is_none() {
    let out = output_path_for(Path::new("/elsewhere/f"), Path::new("/in"), Path::new("/out"), "b3");
    assert!(out.is_none());
    let out = output_path_for(Path::new("/in/d/f.txt"), Path::new("/in"), Path::new("/out"), "b3");
    assert_eq!(out, Some(PathBuf::from("/out/d/f.txt.b3")));
}

#[test]
fn test_canonicalize_roots_requires_input() {
    let tmp = TempDir::new().unwrap();
    assert!(canonicalize_roots(&tmp.path().join("missing"), &tmp.path().join("out")).is_err());
}

// --- directory ---

#[test]
fn test_directory_children_and_get() {
    let tmp = TempDir::new().unwrap();
    let dir = Directory::create(tmp.path().join("d")).unwrap();
    let sub = dir.new_subdir("nested").unwrap();
    write(&dir.new_file("notes", Some("txt")), "n");
    write(&sub.new_file("deep", None), "d");

    assert_eq!(dir.subdirs().unwrap(), vec!["nested"]);
    assert_eq!(dir.files().unwrap(), vec!["notes.txt"]);
    assert_eq!(dir.children().unwrap(), vec!["nested", "notes.txt"]);
    assert!(matches!(dir.get("nested").unwrap(), Child::Dir(_)));
    assert!(matches!(dir.get("notes.txt").unwrap(), Child::File(_)));
    assert!(dir.get("absent").is_err());
    assert_eq!(dir.walk_files(false).len(), 2);
}

#[test]
fn test_directory_open_missing_is_error() {
    let tmp = TempDir::new().unwrap();
    assert!(Directory::open(tmp.path().join("nope")).is_err());
    assert!(Directory::open(tmp.path()).is_ok());
}

// --- metadata ---

#[test]
fn test_metadata_json_and_text() {
    let tmp = TempDir::new().unwrap();
    let json_path = tmp.path().join("deep/summary.json");
    let summary = RunSummary {
        enqueued: 2,
        processed: 2,
        ..RunSummary::default()
    };
    metadata::write_json(&json_path, &summary).unwrap();
    let value: serde_json::Value = metadata::read_json(&json_path).unwrap();
    assert_eq!(value["processed"], serde_json::json!(2));

    let text_path = tmp.path().join("t.txt");
    metadata::write_text(&text_path, "line").unwrap();
    assert_eq!(fs::read_to_string(&text_path).unwrap(), "line\n");
    assert_eq!(metadata::read_text(&text_path).unwrap(), "line");
    assert!(metadata::exists(&text_path));
}

// --- config layers ---

#[test]
fn test_toml_settings_apply_to_opts() {
    let file = parse_batchpipe_toml(
        r#"
[settings]
n_cores = 8
overwrite = true
ext = "digest"
summary = "run.json"
follow_links = true
unknown_key = 1
"#,
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.params.n_cores, 8);
    assert!(opts.params.overwrite);
    assert!(!opts.params.strict);
    assert_eq!(opts.ext, "digest");
    assert_eq!(opts.summary_path, Some(PathBuf::from("run.json")));
    assert!(opts.follow_links);
}

#[test]
fn test_empty_toml_keeps_defaults() {
    let file = parse_batchpipe_toml("").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.params, PipelineParams::DEFAULT);
}

#[test]
fn test_cli_flags_override_file() {
    let mut opts = Opts::default();
    opts.params.n_cores = 8;
    let cli = Cli::parse_from(["batchpipe", "in", "out", "-n", "1", "--strict", "-y", "-L"]);
    apply_cli_to_opts(&cli, &mut opts);
    assert_eq!(opts.params.n_cores, 1);
    assert!(opts.params.strict);
    assert!(opts.assume_yes);
    assert!(opts.follow_links);
    assert!(!opts.params.overwrite);
}

#[test]
fn test_parse_bool_flag() {
    assert_eq!(parse_bool_flag("Yes"), Some(true));
    assert_eq!(parse_bool_flag("0"), Some(false));
    assert_eq!(parse_bool_flag("maybe"), None);
}

// --- prompt ---

#[test]
fn test_yes_no_question_answers() {
    let mut out = Vec::new();
    assert!(yes_no_question("go?", &mut Cursor::new("Y\n"), &mut out).unwrap());
    assert!(!yes_no_question("go?", &mut Cursor::new("false\n"), &mut out).unwrap());
    assert!(String::from_utf8_lossy(&out).contains("go?"));
}

#[test]
fn test_yes_no_question_rejects_unknown() {
    let mut out = Vec::new();
    let err = yes_no_question("go?", &mut Cursor::new("perhaps\n"), &mut out).unwrap_err();
    assert!(err.to_string().contains("Recognised responses"));
}
