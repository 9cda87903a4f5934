use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// 実行環境を環境変数 `ENV` から判定する。未設定なら Development 扱い。
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = "development";
    #[cfg(not(debug_assertions))]
    let default_env = "production";

    match env::var("ENV") {
        Err(_) => default_env.into(),
        Ok(v) => v.as_str().into(),
    }
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }
}
