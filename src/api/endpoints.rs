//! PITCH API 端点
//!
//! 四种查询的 URL 构造，查询参数顺序固定且经过 URL 编码

use crate::config::Config;
use reqwest::Url;

/// 构造端点 URL 所需的课程体系参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    program_code: String,
    version_code: String,
    culture: String,
}

impl Endpoints {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            program_code: config.program_code.clone(),
            version_code: config.version_code.clone(),
            culture: config.culture.clone(),
        }
    }

    /// 技能块列表
    pub fn skill_blocks(&self) -> String {
        self.build(
            "api/SkillBlock",
            &[
                ("ProgramCode", self.program_code.as_str()),
                ("VersionCode", self.version_code.as_str()),
                ("culture", self.culture.as_str()),
                ("simpleversion", "false"),
            ],
        )
    }

    /// 技能块下的一级分类
    pub fn level1_categories(&self, block_code: &str) -> String {
        self.build(
            "api/LearningGoal",
            &[
                ("BlockCode", block_code),
                ("Graph", "Bar"),
                ("ProgramCode", self.program_code.as_str()),
                ("VersionCode", self.version_code.as_str()),
                ("culture", self.culture.as_str()),
            ],
        )
    }

    /// 一级分类下的二级分类
    pub fn level2_categories(&self, block_code: &str, lg_code: &str) -> String {
        self.build(
            "api/LearningGoal",
            &[
                ("BlockCode", block_code),
                ("Graph", "Bar"),
                ("LGCode", lg_code),
                ("ProgramCode", self.program_code.as_str()),
                ("VersionCode", self.version_code.as_str()),
                ("culture", self.culture.as_str()),
            ],
        )
    }

    /// 二级分类的课程详情
    pub fn category_details(&self, lg_code: &str, lo_code: &str) -> String {
        self.build(
            "api/locdetail",
            &[
                ("LGCode", lg_code),
                ("LOCode", lo_code),
                ("ParentProgramCode", self.program_code.as_str()),
                ("culture", self.culture.as_str()),
            ],
        )
    }

    fn build(&self, path: &str, params: &[(&str, &str)]) -> String {
        let raw = format!("{}/{}", self.base_url, path);
        match Url::parse_with_params(&raw, params) {
            Ok(url) => url.to_string(),
            // base_url 不是合法 URL 时原样拼接，请求阶段会报出具体错误
            Err(_) => {
                let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!("{}?{}", raw, query.join("&"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::new(&Config::default())
    }

    #[test]
    fn test_skill_blocks_url() {
        assert_eq!(
            endpoints().skill_blocks(),
            "https://pitch-icam.rima1.fr/api/SkillBlock?ProgramCode=BI&VersionCode=2022&culture=EN-GB&simpleversion=false"
        );
    }

    #[test]
    fn test_learning_goal_urls() {
        assert_eq!(
            endpoints().level1_categories("BI1"),
            "https://pitch-icam.rima1.fr/api/LearningGoal?BlockCode=BI1&Graph=Bar&ProgramCode=BI&VersionCode=2022&culture=EN-GB"
        );
        assert_eq!(
            endpoints().level2_categories("BI1", "LG01"),
            "https://pitch-icam.rima1.fr/api/LearningGoal?BlockCode=BI1&Graph=Bar&LGCode=LG01&ProgramCode=BI&VersionCode=2022&culture=EN-GB"
        );
    }

    #[test]
    fn test_details_url() {
        assert_eq!(
            endpoints().category_details("LG01", "LO07"),
            "https://pitch-icam.rima1.fr/api/locdetail?LGCode=LG01&LOCode=LO07&ParentProgramCode=BI&culture=EN-GB"
        );
    }

    #[test]
    fn test_codes_are_url_encoded() {
        let url = endpoints().category_details("LG 1", "A&B");
        assert!(url.contains("LGCode=LG+1"));
        assert!(url.contains("LOCode=A%26B"));
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let config = Config {
            api_base_url: "http://localhost:8080/".to_string(),
            ..Config::default()
        };
        assert!(Endpoints::new(&config)
            .skill_blocks()
            .starts_with("http://localhost:8080/api/SkillBlock?"));
    }
}
