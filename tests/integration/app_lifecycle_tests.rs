/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::fs;

use overlay_translator::app_config::Config;
use overlay_translator::providers::{MockProvider, ProviderKind};
use overlay_translator::session::{CONFIG_VERSION, SessionConfigPatch};
use overlay_translator::{Controller, Rect};

use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDataDir_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let data_dir = temp_dir.path().join("nested").join("data");

    let controller = Controller::new_for_test(&data_dir, MockProvider::working())?;

    assert!(data_dir.is_dir());
    assert_eq!(controller.sessions().data_dir(), data_dir.as_path());
    assert_eq!(controller.translator().provider().kind(), ProviderKind::Mock);
    Ok(())
}

/// Test the controller built from an app config
#[test]
fn test_controller_withConfig_shouldUseConfiguredDataDirAndProvider() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config {
        provider: ProviderKind::Google,
        data_dir: Some(temp_dir.path().join("from-config")),
        ..Config::default()
    };

    let controller = Controller::with_config(config)?;

    assert!(temp_dir.path().join("from-config").is_dir());
    assert_eq!(controller.translator().provider().kind(), ProviderKind::Google);
    assert_eq!(controller.config().provider, ProviderKind::Google);
    Ok(())
}

#[tokio::test]
async fn test_controller_afterRestart_shouldReuseConfigAndCache() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let session = common::session("restart");
    let rect = Rect::new(0, 0, 500, 80)?;

    {
        let controller = Controller::new_for_test(temp_dir.path(), MockProvider::working())?;
        let patch = SessionConfigPatch::from_json(r#"{"translation": {"dest_lang": "jpn"}}"#)?;
        controller.update_session_config(&session, patch).await?;
        controller.fit_and_translate(&session, "See you tomorrow.", &rect).await?;
    }

    let provider = MockProvider::working();
    let controller = Controller::new_for_test(temp_dir.path(), provider.clone())?;

    let config = controller.session_config(&session).await?;
    assert_eq!(config.translation.dest_lang, "jpn");
    assert_eq!(config.version, CONFIG_VERSION);

    let plan = controller.fit_and_translate(&session, "See you tomorrow.", &rect).await?;
    assert_eq!(plan.text(), "[ja] See you tomorrow.");
    assert_eq!(provider.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_controller_withOutdatedSessionFile_shouldStartFromDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(
        temp_dir.path(),
        "old.json",
        r#"{"version": "4.0.0", "translation": {"src_lang": "jpn", "dest_lang": "eng"}}"#,
    )?;

    let controller = Controller::new_for_test(temp_dir.path(), MockProvider::working())?;
    let config = controller.session_config(&common::session("old")).await?;

    assert_eq!(config.translation.src_lang, "eng");
    assert_eq!(config.translation.dest_lang, "rus");
    assert!(temp_dir.path().join("old.json.v4.0.0").is_file());
    Ok(())
}

#[tokio::test]
async fn test_cacheSummary_shouldCountEntriesPerStore() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test(temp_dir.path(), MockProvider::working())?;
    let session = common::session("summary");
    let rect = Rect::new(0, 0, 500, 80)?;

    assert!(controller.cache_summary(&session)?.is_empty());

    controller.fit_and_translate(&session, "One. Two. Three.", &rect).await?;
    controller.fit_and_translate(&session, "Two. Four.", &rect).await?;

    let summary = controller.cache_summary(&session)?;
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].0, "eng_rus_mock");
    assert_eq!(summary[0].1.entry_count, 4);
    Ok(())
}

#[tokio::test]
async fn test_updateSessionConfig_withInvalidLanguage_shouldBeInputError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test(temp_dir.path(), MockProvider::working())?;
    let session = common::session("invalid");
    controller.session_config(&session).await?;
    let path = temp_dir.path().join("invalid.json");
    let before = fs::read_to_string(&path)?;

    let patch = SessionConfigPatch::from_json(r#"{"translation": {"src_lang": "qq9"}}"#)?;
    let error = controller.update_session_config(&session, patch).await.unwrap_err();

    assert!(error.is_input_error());
    assert_eq!(fs::read_to_string(&path)?, before);
    assert_eq!(controller.sessions().list_sessions()?, vec![session]);
    Ok(())
}

#[tokio::test]
async fn test_testConnection_withFailingProvider_shouldReportError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let healthy = Controller::new_for_test(temp_dir.path(), MockProvider::working())?;
    assert!(healthy.test_connection().await.is_ok());

    let broken = Controller::new_for_test(temp_dir.path(), MockProvider::failing())?;
    assert!(broken.test_connection().await.is_err());
    Ok(())
}
