//! 关键词提取 - 确定性工具
//!
//! 用正则从原文中找出首字母大写的词（专有名词/概念），为后续生成阶段提供锚点。

use std::collections::BTreeSet;

use regex::Regex;
use tracing::{debug, warn};

/// 首字母大写、其余小写的完整单词
const CAPITALIZED_WORD: &str = r"\b[A-Z][a-z]+\b";

/// 关键词提取器（无状态）
pub struct KeywordExtractor;

impl KeywordExtractor {
    /// 提取关键词，返回去重并按字典序排序的列表
    ///
    /// 以下两种位置的大写词会被排除（视为普通的句首大写）：
    /// - 位于整段文本的最开头
    /// - 紧跟在 `". "` 之后
    ///
    /// 空输入返回空列表；正则构建失败时记录警告并返回空列表，不会让流水线失败。
    pub fn extract_keywords(text: Option<&str>) -> Vec<String> {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Vec::new(),
        };

        let re = match Regex::new(CAPITALIZED_WORD) {
            Ok(re) => re,
            Err(e) => {
                warn!("关键词提取失败: {}", e);
                return Vec::new();
            }
        };

        // regex 不支持后顾断言，这里按匹配起点过滤；被排除的匹配不会与其它候选重叠
        let keywords: BTreeSet<String> = re
            .find_iter(text)
            .filter(|m| m.start() != 0 && !text[..m.start()].ends_with(". "))
            .map(|m| m.as_str().to_string())
            .collect();

        debug!("提取到 {} 个关键词", keywords.len());

        keywords.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_missing_input() {
        assert!(KeywordExtractor::extract_keywords(None).is_empty());
        assert!(KeywordExtractor::extract_keywords(Some("")).is_empty());
    }

    #[test]
    fn test_first_word_of_text_is_excluded() {
        let keywords = KeywordExtractor::extract_keywords(Some(
            "Photosynthesis uses Chlorophyll and produces Oxygen.",
        ));
        assert_eq!(keywords, vec!["Chlorophyll", "Oxygen"]);
    }

    #[test]
    fn test_word_after_period_space_is_excluded() {
        let keywords =
            KeywordExtractor::extract_keywords(Some("It discusses Photosynthesis. Chlorophyll helps."));
        assert_eq!(keywords, vec!["Photosynthesis"]);
    }

    #[test]
    fn test_sentence_start_after_newline_is_kept() {
        // 只有 ". " 会触发排除，换行后的句首大写仍然计入
        let keywords = KeywordExtractor::extract_keywords(Some("about Plants.\nOxygen is made."));
        assert_eq!(keywords, vec!["Oxygen", "Plants"]);
    }

    #[test]
    fn test_leading_whitespace_means_first_word_is_not_at_start() {
        let keywords = KeywordExtractor::extract_keywords(Some("\n    Photosynthesis is a process."));
        assert_eq!(keywords, vec!["Photosynthesis"]);
    }

    #[test]
    fn test_output_sorted_and_unique() {
        let keywords = KeywordExtractor::extract_keywords(Some(
            "the Zebra met the Antelope, then the Zebra met Moose and the Antelope again",
        ));
        assert_eq!(keywords, vec!["Antelope", "Moose", "Zebra"]);
        let mut sorted = keywords.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keywords, sorted);
    }

    #[test]
    fn test_only_title_case_words_qualify() {
        let keywords =
            KeywordExtractor::extract_keywords(Some("we saw NASA, McDonald and a Rover on x"));
        assert_eq!(keywords, vec!["Rover"]);
    }
}
