use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[test]
fn it_builds_a_default_engine() {
    let engine = ruleval::RuleEngine::new(&ruleval::EngineConfig::default());
    assert!(engine.is_ok());
}
