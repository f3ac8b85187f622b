//! 重生點群組名稱處理
//!
//! 群組以正式顯示名稱儲存，指令輸入則透過 slug 做寬鬆比對

use serde::{Deserialize, Serialize};
use std::fmt;

/// 將名稱轉為 slug：轉小寫，連續的非英數字元合併為單一 `-`，去除頭尾的 `-`
///
/// # 範例
/// ```
/// use retakes_core::group::slugify;
///
/// assert_eq!(slugify("Long A"), "long-a");
/// assert_eq!(slugify("  B  Site / Back "), "b-site-back");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// 群組名稱是否相同：不分大小寫，非 ASCII 字母（如 `Ä`/`ä`）也一併比對
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// 群組的 slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupSlug(String);

impl GroupSlug {
    pub fn from_name(name: &str) -> Self {
        Self(slugify(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否對應到指定的群組名稱
    pub fn matches_name(&self, name: &str) -> bool {
        self.0 == slugify(name)
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 將管理員輸入的群組名稱解析為既有群組
///
/// 比對優先順序（先符合者勝出）：
/// 1. 顯示名稱完全相符（不分大小寫）
/// 2. slug 完全相符
/// 3. 唯一前綴：恰好一個群組的 slug 或顯示名稱以輸入開頭；零個或多個則失敗
///
/// 永遠不會隱式建立群組
#[derive(Debug, Clone, Default)]
pub struct GroupResolver {
    candidates: Vec<(String, GroupSlug)>,
}

impl GroupResolver {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates = groups
            .into_iter()
            .map(|name| {
                let name = name.as_ref().to_string();
                let slug = GroupSlug::from_name(&name);
                (name, slug)
            })
            .collect();
        Self { candidates }
    }

    /// 解析為群組 slug，失敗（找不到或有歧義）時回傳 None
    pub fn resolve(&self, input: &str) -> Option<GroupSlug> {
        self.find(input).map(|(_, slug)| slug.clone())
    }

    /// 解析為群組的正式顯示名稱
    pub fn resolve_name(&self, input: &str) -> Option<&str> {
        self.find(input).map(|(name, _)| name.as_str())
    }

    fn find(&self, input: &str) -> Option<&(String, GroupSlug)> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let input_lower = input.to_lowercase();
        let slug_in = slugify(input);

        if let Some(exact) = self.candidates.iter().find(|(name, _)| names_match(name, input)) {
            return Some(exact);
        }

        if !slug_in.is_empty() {
            if let Some(exact) = self.candidates.iter().find(|(_, slug)| slug.0 == slug_in) {
                return Some(exact);
            }
        }

        let mut prefixed = self.candidates.iter().filter(|(name, slug)| {
            (!slug_in.is_empty() && slug.0.starts_with(&slug_in))
                || name.to_lowercase().starts_with(&input_lower)
        });

        match (prefixed.next(), prefixed.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Long A"), "long-a");
        assert_eq!(slugify("--Short__B--"), "short-b");
        assert_eq!(slugify("CT Spawn #2"), "ct-spawn-2");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_names_match_folds_non_ascii() {
        assert!(names_match("Long A", "long a"));
        assert!(names_match("Äpfel", "äPFEL"));
        assert!(!names_match("Äpfel", "Apfel"));
    }

    #[test]
    fn test_resolve_precedence() {
        let resolver = GroupResolver::new(["Long A", "Long B"]);

        // 顯示名稱（不分大小寫）
        assert_eq!(resolver.resolve("long a"), Some(GroupSlug::from_name("Long A")));
        // slug
        assert_eq!(resolver.resolve("long-a"), Some(GroupSlug::from_name("Long A")));
        // 有歧義的前綴
        assert_eq!(resolver.resolve("lo"), None);
        // slug 不分大小寫
        assert_eq!(resolver.resolve("LONG-B"), Some(GroupSlug::from_name("Long B")));
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let resolver = GroupResolver::new(["Mid", "Long A"]);

        assert_eq!(resolver.resolve("lo"), Some(GroupSlug::from_name("Long A")));
        assert_eq!(resolver.resolve_name("LONG"), Some("Long A"));
        assert_eq!(resolver.resolve("x"), None);
        assert_eq!(resolver.resolve("   "), None);
    }

    #[test]
    fn test_resolve_does_not_match_symbol_only_input() {
        let resolver = GroupResolver::new(["Mid"]);

        assert_eq!(resolver.resolve("!!"), None);
    }
}
