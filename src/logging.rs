use tracing_subscriber::EnvFilter;

/// ログ初期化（RUST_LOG があれば優先、なければ --verbose で debug）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // テスト等で二重初期化されても失敗にしない
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
