pub mod cluster_preference;
pub mod user_prefs;
