//! 分类处理上下文
//!
//! 封装"我正在处理哪个技能块下的第几个分类"这一信息，
//! 并发任务的结果按上下文中的下标挂回原分类，与完成顺序无关

use std::fmt::Display;

/// 任务所在的层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLevel {
    /// 一级分类（请求其二级分类）
    Level1,
    /// 二级分类（请求其课程详情）
    Level2,
}

/// 分类处理上下文
#[derive(Debug, Clone)]
pub struct CategoryCtx {
    pub level: CategoryLevel,
    /// 所属技能块代码
    pub main_cat: String,
    /// 在父列表中的下标（从0开始）
    pub index: usize,
    /// 一级分类代码
    pub lg_code: Option<String>,
    /// 二级分类代码（仅 Level2）
    pub lo_code: Option<String>,
}

impl CategoryCtx {
    /// 一级分类任务的上下文
    pub fn level1(main_cat: impl Into<String>, index: usize, lg_code: Option<String>) -> Self {
        Self {
            level: CategoryLevel::Level1,
            main_cat: main_cat.into(),
            index,
            lg_code,
            lo_code: None,
        }
    }

    /// 由一级分类上下文派生出二级分类任务的上下文
    pub fn child(&self, index: usize, lo_code: Option<String>) -> Self {
        Self {
            level: CategoryLevel::Level2,
            main_cat: self.main_cat.clone(),
            index,
            lg_code: self.lg_code.clone(),
            lo_code,
        }
    }
}

impl Display for CategoryCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lg = self.lg_code.as_deref().unwrap_or("?");
        match self.level {
            CategoryLevel::Level1 => write!(f, "[{} > {}]", self.main_cat, lg),
            CategoryLevel::Level2 => write!(
                f,
                "[{} > {} > {}]",
                self.main_cat,
                lg,
                self.lo_code.as_deref().unwrap_or("?")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_inherits_parent_keys() {
        let parent = CategoryCtx::level1("BI1", 2, Some("LG3".to_string()));
        let child = parent.child(0, Some("LO9".to_string()));

        assert_eq!(child.level, CategoryLevel::Level2);
        assert_eq!(child.main_cat, "BI1");
        assert_eq!(child.lg_code.as_deref(), Some("LG3"));
        assert_eq!(child.to_string(), "[BI1 > LG3 > LO9]");
        assert_eq!(parent.to_string(), "[BI1 > LG3]");
    }
}
