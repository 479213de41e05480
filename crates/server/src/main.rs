#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use speech_emotion_core::classify::{DeepSeekClassifier, DisabledClassifier, WordClassifier};
use speech_emotion_core::config::{
    resolve_api_key, resolve_string_with_default, resolve_token_hashes, AppConfig, Env, StdEnv,
    DEFAULT_BIND_ADDR, DEFAULT_WORDS_DIR, ENV_API_TOKEN_HASHES, ENV_DEEPSEEK_API_KEY,
    ENV_WORDS_DIR,
};
use speech_emotion_core::lexicon::Lexicon;
use speech_emotion_core::service::{router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "speech-emotion-server")]
#[command(about = "Word-lexicon emotion analysis HTTP service")]
struct Args {
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    #[arg(long)]
    words_dir: Option<String>,

    #[arg(long)]
    deepseek_api_key: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let cfg = build_config(args, &env)?;

    let lexicon = Arc::new(Lexicon::load_dir(&cfg.words_dir)?);
    let classifier: Arc<dyn WordClassifier> = match cfg.deepseek_api_key.clone() {
        Some(key) => Arc::new(DeepSeekClassifier::new(key)),
        None => {
            tracing::warn!("no DeepSeek API key configured; unknown words will not be classified");
            Arc::new(DisabledClassifier)
        }
    };

    let state = Arc::new(AppState::new(
        lexicon,
        classifier,
        cfg.token_hashes.clone(),
    ));

    tracing::info!(
        bind = %cfg.bind_addr,
        words = state.lexicon.len(),
        auth = state.auth.enabled(),
        "serving"
    );

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    if args.bind.trim().is_empty() {
        anyhow::bail!("--bind must not be empty");
    }

    let words_dir = PathBuf::from(resolve_string_with_default(
        args.words_dir,
        ENV_WORDS_DIR,
        env,
        DEFAULT_WORDS_DIR,
    ));
    let deepseek_api_key = resolve_api_key(args.deepseek_api_key, ENV_DEEPSEEK_API_KEY, env)?;
    let token_hashes = resolve_token_hashes(ENV_API_TOKEN_HASHES, env);

    Ok(AppConfig {
        bind_addr: args.bind,
        words_dir,
        deepseek_api_key,
        token_hashes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use speech_emotion_core::config::MapEnv;

    fn args(bind: &str) -> Args {
        Args {
            bind: bind.to_owned(),
            words_dir: None,
            deepseek_api_key: None,
            log_level: "info".to_owned(),
        }
    }

    #[test]
    fn config_defaults_words_dir() {
        let cfg = build_config(args(DEFAULT_BIND_ADDR), &MapEnv::default()).expect("valid");
        assert_eq!(cfg.words_dir, PathBuf::from(DEFAULT_WORDS_DIR));
        assert!(cfg.deepseek_api_key.is_none());
        assert!(cfg.token_hashes.is_empty());
    }

    #[test]
    fn config_reads_env_fallbacks() {
        let env = MapEnv::default()
            .with_var(ENV_WORDS_DIR, "data/words")
            .with_var(ENV_DEEPSEEK_API_KEY, "key")
            .with_var(ENV_API_TOKEN_HASHES, "abc,def");
        let cfg = build_config(args(DEFAULT_BIND_ADDR), &env).expect("valid");
        assert_eq!(cfg.words_dir, PathBuf::from("data/words"));
        assert!(cfg.deepseek_api_key.is_some());
        assert_eq!(cfg.token_hashes.len(), 2);
    }

    #[test]
    fn empty_bind_is_rejected() {
        assert!(build_config(args("  "), &MapEnv::default()).is_err());
    }
}
