//! External API integrations

pub mod supabase;

pub use supabase::SupabaseDataClient;
