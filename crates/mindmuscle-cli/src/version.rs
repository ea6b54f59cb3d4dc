pub const FULL: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "+git.",
    env!("MINDMUSCLE_GIT_COUNT"),
    ".",
    env!("MINDMUSCLE_GIT_SHA"),
    env!("MINDMUSCLE_GIT_DIRTY")
);
