//! エラーケーステスト
//!
//! 解析前の入力不足とエラー表示を検証

use style_advisor::error::StyleAdvisorError;
use style_advisor_common::{
    AnalysisInput, Error, ImageAsset, Missing, Occasion, ReadinessPolicy, SelectionState,
};

const IMAGE: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

/// 写真も選択もない場合はすべて列挙される
#[test]
fn test_nothing_selected() {
    let err = AnalysisInput::from_selection(None, &SelectionState::default(), &ReadinessPolicy::default())
        .unwrap_err();
    match err {
        Error::MissingSelection(missing) => {
            assert_eq!(missing, vec![Missing::Image, Missing::Occasion, Missing::Attire]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// 共通ライブラリのエラーはそのままのメッセージでCLIに伝わる
#[test]
fn test_missing_selection_message() {
    let image = ImageAsset::from_data_url(IMAGE).unwrap();
    let selection = SelectionState { occasion: Some(Occasion::Date), attire: None };
    let err: StyleAdvisorError = AnalysisInput::from_selection(Some(&image), &selection, &ReadinessPolicy::default())
        .unwrap_err()
        .into();
    assert_eq!(err.to_string(), "Please select: attire");
}

#[test]
fn test_attire_optional_policy() {
    let image = ImageAsset::from_data_url(IMAGE).unwrap();
    let selection = SelectionState { occasion: Some(Occasion::Date), attire: None };
    let policy = ReadinessPolicy { attire_required: false };
    assert!(AnalysisInput::from_selection(Some(&image), &selection, &policy).is_ok());
}

#[test]
fn test_analysis_failed_message() {
    let err = StyleAdvisorError::AnalysisFailed("No person found".into());
    assert_eq!(err.to_string(), "解析に失敗しました: No person found");
}
