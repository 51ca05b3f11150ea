use std::str::FromStr;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 生成 / 评估参数 ---
    /// 生成题目时的最大输出 token 数
    pub generation_max_tokens: u32,
    /// 评估（准确性、真伪）时的最大输出 token 数
    pub evaluation_max_tokens: u32,
    pub generation_temperature: f32,
    pub evaluation_temperature: f32,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            generation_max_tokens: 4000,
            evaluation_max_tokens: 2000,
            generation_temperature: 0.7,
            evaluation_temperature: 0.2,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置
    ///
    /// # 参数
    /// - `lookup`: 按变量名取值，未设置返回 `None`
    ///
    /// # 返回
    /// 缺少 API Key 或数值无法解析时返回错误，其余未设置的项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let llm_api_key = lookup("LLM_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            })?;

        Ok(Self {
            llm_api_key,
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            generation_max_tokens: parse_var(&lookup, "GENERATION_MAX_TOKENS", "u32", default.generation_max_tokens)?,
            evaluation_max_tokens: parse_var(&lookup, "EVALUATION_MAX_TOKENS", "u32", default.evaluation_max_tokens)?,
            generation_temperature: parse_var(&lookup, "GENERATION_TEMPERATURE", "f32", default.generation_temperature)?,
            evaluation_temperature: parse_var(&lookup, "EVALUATION_TEMPERATURE", "f32", default.evaluation_temperature)?,
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool", default.verbose_logging)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, expected_type: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }),
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
    fn test_defaults_apply_when_only_key_set() {
        let config = Config::from_lookup(lookup_from(&[("LLM_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.llm_api_key, "sk-test");
        assert_eq!(config.llm_model_name, "gpt-4o");
        assert_eq!(config.generation_max_tokens, 4000);
        assert_eq!(config.evaluation_max_tokens, 2000);
        assert!(!config.verbose_logging);
    }

    #[test]
    fn test_openai_key_fallback() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-openai")])).unwrap();
        assert_eq!(config.llm_api_key, "sk-openai");
    }

    #[test]
    fn test_missing_key_is_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound { ref var_name } if var_name == "LLM_API_KEY"));

        let blank = Config::from_lookup(lookup_from(&[("LLM_API_KEY", "  ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "k"),
            ("LLM_MODEL_NAME", "gpt-4o-mini"),
            ("GENERATION_MAX_TOKENS", "6000"),
            ("EVALUATION_TEMPERATURE", "0"),
            ("VERBOSE_LOGGING", "true"),
        ]))
        .unwrap();
        assert_eq!(config.llm_model_name, "gpt-4o-mini");
        assert_eq!(config.generation_max_tokens, 6000);
        assert_eq!(config.evaluation_temperature, 0.0);
        assert!(config.verbose_logging);
    }

    #[test]
    fn test_bad_number_is_parse_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "k"),
            ("GENERATION_MAX_TOKENS", "lots"),
        ]))
        .unwrap_err();
        match err {
            ConfigError::EnvVarParseFailed { var_name, value, expected_type } => {
                assert_eq!(var_name, "GENERATION_MAX_TOKENS");
                assert_eq!(value, "lots");
                assert_eq!(expected_type, "u32");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
