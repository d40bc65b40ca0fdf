use std::fmt;

use crate::utils::logging::truncate_text;

/// 题目选项，收到后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqOption {
    pub id: String,
    pub label: String,
}

/// 出题人信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub avatar_url: String,
}

/// 一道选择题，身份由 `id` 决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqItem {
    pub id: u64,
    /// 服务端返回的 `type` 字段
    pub kind: String,
    pub question: String,
    pub options: Vec<McqOption>,
    pub image: String,
    pub description: String,
    pub playlist: String,
    pub author: Author,
}

impl McqItem {
    /// 按 id 查找选项
    pub fn option(&self, option_id: &str) -> Option<&McqOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.option(option_id).is_some()
    }
}

impl fmt::Display for McqItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} [{} 个选项]",
            self.id,
            truncate_text(&self.question, 60),
            self.options.len()
        )
    }
}
