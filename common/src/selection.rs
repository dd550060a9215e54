//! シーン（occasion）・服装（attire）の選択状態

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Missing, Result};

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// APIに送る値
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// 画面表示用ラベル
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let needle = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| Error::Config(format!(
                        "unknown {} '{}' (expected one of: {})",
                        stringify!($name).to_lowercase(),
                        needle,
                        $name::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", "),
                    )))
            }
        }
    };
}

choice_enum! {
    /// 着用シーン
    Occasion {
        Casual => ("casual", "Casual Day Out"),
        Work => ("work", "Work / Office"),
        Date => ("date", "Date Night"),
        Party => ("party", "Party"),
        Wedding => ("wedding", "Wedding"),
        Interview => ("interview", "Job Interview"),
        FormalEvent => ("formal-event", "Formal Event"),
        Outdoor => ("outdoor", "Outdoor Activity"),
    }
}

choice_enum! {
    /// 服装の系統
    Attire {
        Casual => ("casual", "Casual"),
        SmartCasual => ("smart-casual", "Smart Casual"),
        Business => ("business", "Business"),
        Formal => ("formal", "Formal"),
        Streetwear => ("streetwear", "Streetwear"),
        Traditional => ("traditional", "Traditional"),
    }
}

/// 解析開始の可否判定ルール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessPolicy {
    pub attire_required: bool,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self { attire_required: true }
    }
}

/// ユーザーの選択状態（リロードで消える）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub occasion: Option<Occasion>,
    pub attire: Option<Attire>,
}

impl SelectionState {
    pub fn set_occasion(&mut self, occasion: Option<Occasion>) {
        self.occasion = occasion;
    }

    pub fn set_attire(&mut self, attire: Option<Attire>) {
        self.attire = attire;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 不足している項目（表示順）
    pub fn missing(&self, has_image: bool, policy: &ReadinessPolicy) -> Vec<Missing> {
        let mut missing = Vec::new();
        if !has_image {
            missing.push(Missing::Image);
        }
        if self.occasion.is_none() {
            missing.push(Missing::Occasion);
        }
        if policy.attire_required && self.attire.is_none() {
            missing.push(Missing::Attire);
        }
        missing
    }

    pub fn is_ready(&self, has_image: bool, policy: &ReadinessPolicy) -> bool {
        self.missing(has_image, policy).is_empty()
    }

    pub fn require_ready(&self, has_image: bool, policy: &ReadinessPolicy) -> Result<()> {
        let missing = self.missing(has_image, policy);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingSelection(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> SelectionState {
        SelectionState { occasion: Some(Occasion::Work), attire: Some(Attire::Business) }
    }

    #[test]
    fn test_ready_with_image_and_both_selections() {
        assert!(full().is_ready(true, &ReadinessPolicy::default()));
    }

    #[test]
    fn test_not_ready_without_image() {
        let policy = ReadinessPolicy::default();
        assert!(!full().is_ready(false, &policy));
        assert_eq!(full().missing(false, &policy), vec![Missing::Image]);
    }

    #[test]
    fn test_not_ready_when_either_selection_removed() {
        let policy = ReadinessPolicy::default();

        let mut state = full();
        state.set_occasion(None);
        assert!(!state.is_ready(true, &policy));

        let mut state = full();
        state.set_attire(None);
        assert!(!state.is_ready(true, &policy));
    }

    #[test]
    fn test_attire_optional_policy() {
        let policy = ReadinessPolicy { attire_required: false };
        let state = SelectionState { occasion: Some(Occasion::Date), attire: None };
        assert!(state.is_ready(true, &policy));
    }

    #[test]
    fn test_require_ready_lists_missing() {
        let err = SelectionState::default()
            .require_ready(true, &ReadinessPolicy::default())
            .unwrap_err();
        match err {
            Error::MissingSelection(items) => {
                assert_eq!(items, vec![Missing::Occasion, Missing::Attire])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_clear() {
        let mut state = full();
        state.clear();
        assert_eq!(state, SelectionState::default());
    }

    #[test]
    fn test_occasion_from_str() {
        assert_eq!("formal-event".parse::<Occasion>().unwrap(), Occasion::FormalEvent);
        assert_eq!(" WORK ".parse::<Occasion>().unwrap(), Occasion::Work);
        assert!("gala".parse::<Occasion>().is_err());
    }

    #[test]
    fn test_attire_serde_uses_wire_value() {
        let json = serde_json::to_string(&Attire::SmartCasual).unwrap();
        assert_eq!(json, "\"smart-casual\"");
        let parsed: Attire = serde_json::from_str("\"streetwear\"").unwrap();
        assert_eq!(parsed, Attire::Streetwear);
    }

    #[test]
    fn test_all_lists_every_value() {
        assert_eq!(Occasion::ALL.len(), 8);
        assert_eq!(Attire::ALL.len(), 6);
        assert_eq!(Attire::SmartCasual.label(), "Smart Casual");
    }
}
