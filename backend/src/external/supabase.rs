//! Supabase-style data API client
//!
//! Fetches the flat entity collections over the PostgREST interface. The
//! tree fetch prefers the `get_arboles_with_frutos` RPC (one round trip,
//! fruits pre-joined) and falls back to joining the `arbol` and `fruto`
//! tables in memory when the RPC is unavailable.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use shared::models::{CropRecord, FarmRecord, FruitRecord, LotRecord, StateLabel, TreeRecord};

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};

const TREES_RPC: &str = "get_arboles_with_frutos";

/// Client for the upstream data API
#[derive(Clone)]
pub struct SupabaseDataClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseDataClient {
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch rows from a table through the REST interface
    async fn rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamService(format!(
                "{} returned HTTP {}",
                table,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Call a parameterless RPC function
    async fn rpc<T: DeserializeOwned>(&self, function: &str) -> AppResult<Vec<T>> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamService(format!(
                "rpc {} returned HTTP {}",
                function,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    pub async fn farms(&self) -> AppResult<Vec<FarmRecord>> {
        self.rows("finca", &[("select", "finca_id,nombre,created_at".into())])
            .await
    }

    pub async fn lots(&self) -> AppResult<Vec<LotRecord>> {
        self.rows(
            "lote",
            &[("select", "lote_id,nombre,finca_id,estado,poligono".into())],
        )
        .await
    }

    pub async fn lots_by_farm(&self, farm_id: Uuid) -> AppResult<Vec<LotRecord>> {
        self.rows(
            "lote",
            &[
                ("select", "lote_id,nombre,finca_id,estado,poligono".into()),
                ("finca_id", format!("eq.{farm_id}")),
            ],
        )
        .await
    }

    pub async fn crops(&self) -> AppResult<Vec<CropRecord>> {
        self.rows(
            "cultivo",
            &[(
                "select",
                "cultivo_id,nombre,especie,lote_id,poligono".into(),
            )],
        )
        .await
    }

    pub async fn state_labels(&self) -> AppResult<Vec<StateLabel>> {
        self.rows("estado_cacao", &[("select", "estado_cacao_id,nombre".into())])
            .await
    }

    /// Fetch all trees with their fruits nested
    pub async fn trees_with_fruits(&self) -> AppResult<Vec<TreeRecord>> {
        match self.rpc::<TreeRecord>(TREES_RPC).await {
            Ok(trees) => Ok(trees),
            Err(rpc_error) => {
                tracing::warn!("{TREES_RPC} unavailable, joining tables directly: {rpc_error}");
                self.trees_with_fruits_joined().await
            }
        }
    }

    async fn trees_with_fruits_joined(&self) -> AppResult<Vec<TreeRecord>> {
        let mut trees: Vec<TreeRecord> = self
            .rows(
                "arbol",
                &[(
                    "select",
                    "arbol_id,cultivo_id,nombre,especie,estado_arbol,ubicacion".into(),
                )],
            )
            .await?;

        let fruits: Vec<FruitRecord> = self
            .rows(
                "fruto",
                &[(
                    "select",
                    "fruto_id,arbol_id,especie,estado_fruto,created_at".into(),
                )],
            )
            .await?;

        let mut fruits_by_tree: HashMap<Uuid, Vec<FruitRecord>> = HashMap::new();
        for fruit in fruits {
            if let Some(tree_id) = fruit.tree_id {
                fruits_by_tree.entry(tree_id).or_default().push(fruit);
            }
        }
        for tree in &mut trees {
            if let Some(fruits) = fruits_by_tree.remove(&tree.id) {
                tree.fruits = fruits;
            }
        }

        Ok(trees)
    }
}
