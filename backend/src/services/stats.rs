//! Statistics service over the assembled hierarchy

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::hierarchy::{self, Assembly, HierarchyNode};
use shared::models::{Farm, StateIndex};
use shared::types::{StructureCounts, UnassignedCounts};

use crate::error::AppResult;
use crate::external::SupabaseDataClient;

/// Statistics service
#[derive(Clone)]
pub struct StatsService {
    data: SupabaseDataClient,
}

/// Farm entry for filter dropdowns
#[derive(Debug, Serialize)]
pub struct FarmSummary {
    #[serde(rename = "finca_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Lot entry for filter dropdowns
#[derive(Debug, Serialize)]
pub struct LotSummary {
    #[serde(rename = "lote_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// State counts plus structural census for one scope
#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub conteo: BTreeMap<String, u64>,
    pub estructura: StructureCounts,
}

/// Per-farm statistics entry
#[derive(Debug, Serialize)]
pub struct FarmStats {
    #[serde(rename = "finca_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    pub conteo: BTreeMap<String, u64>,
    pub estructura: StructureCounts,
}

/// Full statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub resumen_general: StatsSummary,
    pub por_finca: Vec<FarmStats>,
    pub fincas: Vec<Farm>,
    #[serde(rename = "sin_asignar")]
    pub unassigned: UnassignedCounts,
}

/// Optional scope filters for `/stats`
#[derive(Debug, Default, Deserialize)]
pub struct StatsFilter {
    pub finca_id: Option<Uuid>,
    pub lote_id: Option<Uuid>,
}

impl StatsService {
    pub fn new(data: SupabaseDataClient) -> Self {
        Self { data }
    }

    /// Farm list for filters
    pub async fn farms(&self) -> AppResult<Vec<FarmSummary>> {
        let farms = self.data.farms().await?;
        Ok(farms
            .into_iter()
            .map(|farm| FarmSummary {
                id: farm.id,
                name: farm.name,
            })
            .collect())
    }

    /// Lots of one farm for filters
    pub async fn lots_by_farm(&self, farm_id: Uuid) -> AppResult<Vec<LotSummary>> {
        let lots = self.data.lots_by_farm(farm_id).await?;
        Ok(lots
            .into_iter()
            .map(|lot| LotSummary {
                id: lot.id,
                name: lot.name,
            })
            .collect())
    }

    /// Full nested hierarchy for the zones screen
    pub async fn zones(&self) -> AppResult<Vec<Farm>> {
        Ok(self.assembly().await?.farms)
    }

    /// Complete statistics with optional scope filters
    pub async fn stats(&self, filter: StatsFilter) -> AppResult<StatsResponse> {
        let assembly = self.assembly().await?;
        Ok(build_stats(assembly, &filter))
    }

    async fn assembly(&self) -> AppResult<Assembly> {
        let labels = self.data.state_labels().await?;
        let states = StateIndex::from_labels(&labels);
        let farms = self.data.farms().await?;
        let lots = self.data.lots().await?;
        let crops = self.data.crops().await?;
        let trees = self.data.trees_with_fruits().await?;

        let assembly = hierarchy::assemble(farms, lots, crops, trees, &states);
        if !assembly.unassigned.is_empty() {
            tracing::warn!(
                unassigned = ?assembly.unassigned,
                "records without resolvable parent dropped from hierarchy"
            );
        }
        Ok(assembly)
    }
}

/// Compute the statistics response from an assembled hierarchy.
pub fn build_stats(mut assembly: Assembly, filter: &StatsFilter) -> StatsResponse {
    if let Some(farm_id) = filter.finca_id {
        assembly.farms.retain(|farm| farm.id == farm_id);
    }
    if let Some(lot_id) = filter.lote_id {
        for farm in &mut assembly.farms {
            farm.lots.retain(|lot| lot.id == lot_id);
        }
    }

    let resumen_general = StatsSummary {
        conteo: hierarchy::count_states(&assembly.farms),
        estructura: hierarchy::count_structure(&assembly.farms),
    };

    let por_finca = assembly
        .farms
        .iter()
        .map(|farm| FarmStats {
            id: farm.id,
            name: farm.name.clone(),
            conteo: hierarchy::count_states([HierarchyNode::from(farm)]),
            estructura: hierarchy::count_structure(std::slice::from_ref(farm)),
        })
        .collect();

    StatsResponse {
        resumen_general,
        por_finca,
        fincas: assembly.farms,
        unassigned: assembly.unassigned,
    }
}
