use crate::error::AppError;
use crate::models::DuplicatePolicy;

/// 运行模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// 每个 (文档, 问题) 单独请求
    Single,
    /// 每个文档一次请求，所有问题合并
    Bulk,
    /// 只格式化已有的透视表
    Format,
}

impl RunMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Some(RunMode::Single),
            "bulk" => Some(RunMode::Bulk),
            "format" => Some(RunMode::Format),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    pub run_mode: RunMode,
    /// PDF 输入目录
    pub input_folder: String,
    /// 问题表格文件
    pub questions_file: String,
    /// 问题所在行（从 0 开始）
    pub question_row: u32,
    /// 每行最多读取的问题数
    pub max_questions: usize,
    /// 每个文档同时进行的请求数
    pub max_concurrent_questions: usize,
    /// 输出目录
    pub output_dir: String,
    /// 失败记录文件
    pub failure_log_file: String,
    /// 透视时遇到重复 (文档, 问题) 的处理方式
    pub duplicate_policy: DuplicatePolicy,
    /// 报表列配置文件（可选，缺省使用内置列表）
    pub column_layout_file: Option<String>,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub bulk_model_name: String,
    /// 只接受精简调用方式的模型
    pub simplified_models: Vec<String>,
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Single,
            input_folder: "input".to_string(),
            questions_file: "questions_v3v2.xlsx".to_string(),
            question_row: 1,
            max_questions: 16,
            max_concurrent_questions: 10,
            output_dir: ".".to_string(),
            failure_log_file: "failures.txt".to_string(),
            duplicate_policy: DuplicatePolicy::Reject,
            column_layout_file: None,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            bulk_model_name: "o1-preview".to_string(),
            simplified_models: vec!["o1-preview".to_string(), "o1-mini".to_string()],
            max_tokens: 2048,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置或无法解析的数值项使用默认值
    ///
    /// 枚举类的配置项（`RUN_MODE`、`PIVOT_ON_DUPLICATE`）写错时直接报错，
    /// 避免悄悄跑成另一种模式。
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置（测试时可以传入固定的表）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let run_mode = match lookup("RUN_MODE") {
            Some(value) => RunMode::parse(&value).ok_or_else(|| AppError::InvalidConfig {
                var_name: "RUN_MODE".to_string(),
                value,
            })?,
            None => default.run_mode,
        };

        let duplicate_policy = match lookup("PIVOT_ON_DUPLICATE") {
            Some(value) => {
                DuplicatePolicy::parse(&value).ok_or_else(|| AppError::InvalidConfig {
                    var_name: "PIVOT_ON_DUPLICATE".to_string(),
                    value,
                })?
            }
            None => default.duplicate_policy,
        };

        let simplified_models = lookup("SIMPLIFIED_MODELS")
            .map(|v| {
                v.split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect()
            })
            .unwrap_or(default.simplified_models);

        Ok(Self {
            run_mode,
            input_folder: lookup("INPUT_FOLDER").unwrap_or(default.input_folder),
            questions_file: lookup("QUESTIONS_FILE").unwrap_or(default.questions_file),
            question_row: lookup("QUESTION_ROW").and_then(|v| v.parse().ok()).unwrap_or(default.question_row),
            max_questions: lookup("MAX_QUESTIONS").and_then(|v| v.parse().ok()).unwrap_or(default.max_questions),
            max_concurrent_questions: lookup("MAX_CONCURRENT_QUESTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.max_concurrent_questions),
            output_dir: lookup("OUTPUT_DIR").unwrap_or(default.output_dir),
            failure_log_file: lookup("FAILURE_LOG_FILE").unwrap_or(default.failure_log_file),
            duplicate_policy,
            column_layout_file: lookup("COLUMN_LAYOUT_FILE").or(default.column_layout_file),
            llm_api_key: lookup("OPENAI_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            bulk_model_name: lookup("BULK_MODEL_NAME").unwrap_or(default.bulk_model_name),
            simplified_models,
            max_tokens: lookup("MAX_TOKENS").and_then(|v| v.parse().ok()).unwrap_or(default.max_tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.run_mode, RunMode::Single);
        assert_eq!(config.max_concurrent_questions, 10);
        assert_eq!(config.question_row, 1);
        assert_eq!(config.max_questions, 16);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.simplified_models, vec!["o1-preview", "o1-mini"]);
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = Config::from_lookup(lookup_from(&[
            ("RUN_MODE", "Bulk"),
            ("MAX_CONCURRENT_QUESTIONS", "abc"),
            ("MAX_QUESTIONS", "4"),
            ("SIMPLIFIED_MODELS", " o1 , , o3-mini "),
            ("PIVOT_ON_DUPLICATE", "last-write-wins"),
        ]))
        .unwrap();
        assert_eq!(config.run_mode, RunMode::Bulk);
        assert_eq!(config.max_concurrent_questions, 10);
        assert_eq!(config.max_questions, 4);
        assert_eq!(config.simplified_models, vec!["o1", "o3-mini"]);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWriteWins);
    }

    #[test]
    fn test_zero_concurrency_falls_back() {
        let config =
            Config::from_lookup(lookup_from(&[("MAX_CONCURRENT_QUESTIONS", "0")])).unwrap();
        assert_eq!(config.max_concurrent_questions, 10);
    }

    #[test]
    fn test_unknown_run_mode_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("RUN_MODE", "both")])).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig { ref var_name, .. } if var_name == "RUN_MODE"));
    }
}
