//! 接口响应结构
//!
//! `/for_you` 与 `/reveal` 两个接口的原始 JSON 结构，解析后转换为领域类型

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::models::question::{Author, McqItem, McqOption};

/// `GET /for_you` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct ForYouPayload {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub id: u64,
    #[serde(default)]
    pub playlist: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub question: String,
    pub options: Vec<OptionPayload>,
    pub user: UserPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionPayload {
    #[serde(deserialize_with = "deserialize_option_id")]
    pub id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// `GET /reveal?id=` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct RevealPayload {
    #[serde(default)]
    pub correct_options: Vec<CorrectOptionPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrectOptionPayload {
    #[serde(deserialize_with = "deserialize_option_id")]
    pub id: String,
}

impl RevealPayload {
    /// 第一个正确选项的 id
    pub fn first_correct(&self) -> Option<&str> {
        self.correct_options.first().map(|o| o.id.as_str())
    }
}

/// 题目结构不合法
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("题目结构不合法: {0}")]
pub struct InvalidPayload(pub String);

impl TryFrom<ForYouPayload> for McqItem {
    type Error = InvalidPayload;

    fn try_from(payload: ForYouPayload) -> Result<Self, Self::Error> {
        if payload.options.is_empty() {
            return Err(InvalidPayload(format!("题目 {} 没有选项", payload.id)));
        }

        Ok(McqItem {
            id: payload.id,
            kind: payload.kind,
            question: payload.question,
            options: payload
                .options
                .into_iter()
                .map(|o| McqOption {
                    id: o.id,
                    label: o.answer,
                })
                .collect(),
            image: payload.image,
            description: payload.description,
            playlist: payload.playlist,
            author: Author {
                name: payload.user.name,
                avatar_url: payload.user.avatar,
            },
        })
    }
}

// 选项 id 可能是字符串也可能是整数，统一成字符串
fn deserialize_option_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct OptionIdVisitor;

    impl<'de> Visitor<'de> for OptionIdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer option id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(OptionIdVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn for_you_json() -> serde_json::Value {
        json!({
            "type": "mcq",
            "id": 4211,
            "playlist": "Period 6: 1865-1898",
            "description": "5.5 Sectional Conflict: Regional Differences",
            "image": "https://example.com/img.png",
            "question": "What was the name of the Act that created federal subsidies?",
            "options": [
                { "id": "A", "answer": "Homestead Act" },
                { "id": "B", "answer": "Pacific Railway Act" }
            ],
            "user": { "name": "AP US History", "avatar": "https://example.com/a.png" }
        })
    }

    #[test]
    fn test_for_you_payload_into_item() {
        let payload: ForYouPayload = serde_json::from_value(for_you_json()).unwrap();
        let item = McqItem::try_from(payload).unwrap();

        assert_eq!(item.id, 4211);
        assert_eq!(item.kind, "mcq");
        assert_eq!(item.options.len(), 2);
        assert_eq!(item.options[1].label, "Pacific Railway Act");
        assert_eq!(item.author.name, "AP US History");
        assert_eq!(item.author.avatar_url, "https://example.com/a.png");
        assert!(item.has_option("A"));
        assert!(!item.has_option("C"));
    }

    #[test]
    fn test_numeric_option_ids() {
        let mut value = for_you_json();
        value["options"] = json!([{ "id": 1, "answer": "x" }, { "id": 2, "answer": "y" }]);
        let payload: ForYouPayload = serde_json::from_value(value).unwrap();
        assert_eq!(payload.options[0].id, "1");
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut value = for_you_json();
        value.as_object_mut().unwrap().remove("question");
        assert!(serde_json::from_value::<ForYouPayload>(value).is_err());
    }

    #[test]
    fn test_empty_options_is_invalid() {
        let mut value = for_you_json();
        value["options"] = json!([]);
        let payload: ForYouPayload = serde_json::from_value(value).unwrap();
        let id = payload.id;
        let err = McqItem::try_from(payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("题目结构不合法: 题目 {id} 没有选项")
        );
    }

    #[test]
    fn test_reveal_payload_takes_first_entry() {
        let payload: RevealPayload = serde_json::from_value(json!({
            "id": 4211,
            "correct_options": [
                { "id": "B", "answer": "Pacific Railway Act" },
                { "id": "A", "answer": "Homestead Act" }
            ]
        }))
        .unwrap();
        assert_eq!(payload.first_correct(), Some("B"));

        let empty: RevealPayload = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert_eq!(empty.first_correct(), None);
    }
}
