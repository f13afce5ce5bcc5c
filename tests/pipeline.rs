//! 端到端流水线测试：脚本化文本客户端 + 假语音客户端 + 字节拼接

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use topicast::application::ports::{AlwaysConfirm, ConfirmerPort};
use topicast::application::prompts::DISCLAIMER;
use topicast::application::services::{
    topic_work_dir, DescriptionFormat, Pipeline, PipelinePorts, PipelineSettings, RunOptions,
};
use topicast::domain::Topic;
use topicast::infrastructure::adapters::{
    ConcatMuxer, FakeSpeechClient, FileAudioStorage, ScriptedTextClient,
};
use topicast::infrastructure::persistence::FileContentCache;
use topicast::PipelineError;

const OUTLINE: &str = "1. Origins\n2. Key Ideas\n3. Legacy";
const ORIGINS: &str = "Stoicism began in Athens around 300 BC.\n\nZeno taught at the painted porch.";
const KEY_IDEAS: &str = "Virtue is the only good.";
const LEGACY: &str = "Marcus Aurelius kept the tradition alive.";

struct DenyConfirm;

impl ConfirmerPort for DenyConfirm {
    fn confirm(&self, _question: &str) -> bool {
        false
    }
}

struct Harness {
    pipeline: Pipeline,
    text: Arc<ScriptedTextClient>,
    speech: Arc<FakeSpeechClient>,
}

async fn harness(
    root: &Path,
    responses: &[&str],
    confirmer: Arc<dyn ConfirmerPort>,
) -> Harness {
    let topic = Topic::parse("Stoicism").unwrap();
    let work_dir = topic_work_dir(&root.join("work"), &topic);
    let cache = Arc::new(FileContentCache::new(&work_dir).await.unwrap());
    let text = Arc::new(ScriptedTextClient::new(
        responses.iter().map(|s| s.to_string()),
    ));
    let speech = Arc::new(FakeSpeechClient::new());

    let ports = PipelinePorts {
        text: text.clone(),
        speech: speech.clone(),
        muxer: Arc::new(ConcatMuxer::new()),
        storage: Arc::new(FileAudioStorage::new()),
        confirmer,
    };
    let settings = PipelineSettings {
        max_workers: 1,
        output_dir: root.join("out"),
        ..Default::default()
    };

    Harness {
        pipeline: Pipeline::new(topic, work_dir, cache, ports, settings),
        text,
        speech,
    }
}

fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |ext| ext == extension))
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn test_generates_narration_and_reuses_everything_on_rerun() {
    let root = TempDir::new().unwrap();
    let output = root.path().join("stoicism.mp3");
    let options = RunOptions {
        output_path: Some(output.clone()),
        ..Default::default()
    };

    let first = harness(
        root.path(),
        &[OUTLINE, "serene-female", ORIGINS, KEY_IDEAS, LEGACY],
        Arc::new(AlwaysConfirm),
    )
    .await;
    let result = first.pipeline.run(&options).await.unwrap();

    assert_eq!(result.output_path, output);
    assert_eq!(result.outline.lines(), vec!["1. Origins", "2. Key Ideas", "3. Legacy"]);
    assert_eq!(result.speech.synthesized, 3);
    assert_eq!(first.text.call_count(), 5);
    assert_eq!(first.speech.call_count(), 3);
    assert!(first.speech.voices().iter().all(|v| v == "nova"));
    assert_eq!(files_with_extension(first.pipeline.work_dir(), "mp3").len(), 3);

    // 输出按大纲顺序拼接
    let expected: Vec<u8> = [
        format!(
            "\"Stoicism\"\n\n{}\n\nSection 1: Origins.\n\n{}",
            DISCLAIMER, ORIGINS
        ),
        format!("Section 2: Key Ideas.\n\n{}", KEY_IDEAS),
        format!("Section 3: Legacy.\n\n{}", LEGACY),
    ]
    .iter()
    .flat_map(|text| FakeSpeechClient::render(text, "nova"))
    .collect();
    let first_bytes = std::fs::read(&output).unwrap();
    assert_eq!(first_bytes, expected);

    // 第二次运行：缓存和音频全部复用，不调用任何服务
    std::fs::remove_file(&output).unwrap();
    let second = harness(root.path(), &[], Arc::new(AlwaysConfirm)).await;
    let rerun = second.pipeline.run(&options).await.unwrap();

    assert_eq!(second.text.call_count(), 0);
    assert_eq!(second.speech.call_count(), 0);
    assert_eq!(rerun.speech.skipped, 3);
    assert_eq!(std::fs::read(&output).unwrap(), first_bytes);
}

#[tokio::test]
async fn test_without_disclaimer() {
    let root = TempDir::new().unwrap();
    let output = root.path().join("plain.mp3");
    let options = RunOptions {
        output_path: Some(output.clone()),
        include_disclaimer: false,
        ..Default::default()
    };

    let h = harness(
        root.path(),
        &["1. Origins", "neutral", ORIGINS],
        Arc::new(AlwaysConfirm),
    )
    .await;
    h.pipeline.run(&options).await.unwrap();

    let narrated = String::from_utf8(std::fs::read(&output).unwrap()).unwrap();
    assert!(narrated.starts_with("[alloy] \"Stoicism\"\n\nSection 1: Origins."));
    assert!(!narrated.contains(DISCLAIMER));
}

#[tokio::test]
async fn test_default_output_goes_to_output_dir() {
    let root = TempDir::new().unwrap();
    let h = harness(
        root.path(),
        &["1. Origins", "neutral", ORIGINS],
        Arc::new(AlwaysConfirm),
    )
    .await;

    let result = h.pipeline.run(&RunOptions::default()).await.unwrap();

    assert_eq!(result.output_path.parent(), Some(root.path().join("out").as_path()));
    let name = result.output_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.ends_with(" Stoicism.mp3"), "{}", name);
    assert!(result.output_path.exists());
}

#[tokio::test]
async fn test_existing_directory_as_output() {
    let root = TempDir::new().unwrap();
    let target = root.path().join("episodes");
    std::fs::create_dir_all(&target).unwrap();
    let h = harness(
        root.path(),
        &["1. Origins", "neutral", ORIGINS],
        Arc::new(AlwaysConfirm),
    )
    .await;

    let options = RunOptions {
        output_path: Some(target.clone()),
        ..Default::default()
    };
    let result = h.pipeline.run(&options).await.unwrap();
    assert_eq!(result.output_path.parent(), Some(target.as_path()));
}

#[tokio::test]
async fn test_output_without_mp3_suffix_is_input_error() {
    let root = TempDir::new().unwrap();
    let h = harness(
        root.path(),
        &["1. Origins", "neutral", ORIGINS],
        Arc::new(AlwaysConfirm),
    )
    .await;

    let options = RunOptions {
        output_path: Some(root.path().join("episode.wav")),
        ..Default::default()
    };
    let err = h.pipeline.run(&options).await.unwrap_err();
    assert!(matches!(err, PipelineError::Input(_)));
}

#[tokio::test]
async fn test_refused_confirmation_stops_before_sections() {
    let root = TempDir::new().unwrap();
    let h = harness(root.path(), &[OUTLINE, "neutral"], Arc::new(DenyConfirm)).await;

    let options = RunOptions {
        confirm: true,
        ..Default::default()
    };
    let err = h.pipeline.run(&options).await.unwrap_err();

    assert!(matches!(&err, PipelineError::Input(msg) if msg == "User canceled."));
    assert_eq!(h.text.call_count(), 2);
    assert_eq!(h.speech.call_count(), 0);
}

#[tokio::test]
async fn test_rejected_topic_surfaces_reason() {
    let root = TempDir::new().unwrap();
    let h = harness(
        root.path(),
        &["Error: not suitable", "Error: still not suitable"],
        Arc::new(AlwaysConfirm),
    )
    .await;

    let err = h.pipeline.run(&RunOptions::default()).await.unwrap_err();
    match &err {
        PipelineError::ContentRejection(reason) => assert!(reason.contains("still not suitable")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.exit_code(), 4);
    assert_eq!(h.speech.call_count(), 0);
}

#[tokio::test]
async fn test_outline_prompts_do_not_collide_in_cache() {
    let root = TempDir::new().unwrap();
    let h = harness(
        root.path(),
        &["1. Origins\n2. Legacy", "1. Origins"],
        Arc::new(AlwaysConfirm),
    )
    .await;

    let full = h
        .pipeline
        .describe(None, DescriptionFormat::Plain)
        .await
        .unwrap();
    let capped = h
        .pipeline
        .describe(Some(1), DescriptionFormat::Plain)
        .await
        .unwrap();

    assert_eq!(full, "Sections:\n\n1. Origins\n2. Legacy");
    assert_eq!(capped, "Sections:\n\n1. Origins");
    assert_eq!(h.text.call_count(), 2);

    let outline_entries: Vec<PathBuf> = files_with_extension(h.pipeline.work_dir(), "txt")
        .into_iter()
        .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with("0. outline"))
        .collect();
    assert_eq!(outline_entries.len(), 2);

    // 相同参数再次调用命中缓存
    let again = h
        .pipeline
        .describe(None, DescriptionFormat::Plain)
        .await
        .unwrap();
    assert_eq!(again, full);
    assert_eq!(h.text.call_count(), 2);
}
