//! Hierarchy assembly and recursive counting
//!
//! Field data arrives as independent flat collections keyed by foreign ids.
//! [`assemble`] reshapes them into the Farm→Lot→Crop→Tree→Fruit tree and
//! reports what could not be attached; the counting operations walk any
//! subtree through the [`HierarchyNode`] visitor.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use uuid::Uuid;

use crate::geo;
use crate::models::{
    Crop, CropRecord, Farm, FarmRecord, Fruit, Lot, LotRecord, StateIndex, Tree, TreeRecord,
};
use crate::normalize::normalize;
use crate::types::{StructureCounts, UnassignedCounts};

/// Result of assembling flat rows into the farm hierarchy
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    #[serde(rename = "fincas")]
    pub farms: Vec<Farm>,
    #[serde(rename = "sin_asignar")]
    pub unassigned: UnassignedCounts,
}

/// Assemble flat record collections into nested farms.
///
/// Lots attach to farms and trees to crops by foreign id only. Crops resolve
/// their lot through an ordered fallback chain; a later rule runs only when
/// every earlier rule fails for that record:
///
/// 1. declared `lote_id` present in the lot index,
/// 2. normalized-name equality of the crop-name prefix with a lot name,
/// 3. the same comparison with a leading `Lote`⇄`Zona` token swapped,
/// 4. point-in-polygon containment of the crop centroid in a lot polygon.
///
/// Records whose parent cannot be resolved by any rule are dropped from the
/// tree and tallied in [`Assembly::unassigned`]. Sibling order is input
/// order; the inputs are consumed, never aliased.
pub fn assemble(
    farm_rows: Vec<FarmRecord>,
    lot_rows: Vec<LotRecord>,
    crop_rows: Vec<CropRecord>,
    tree_rows: Vec<TreeRecord>,
    states: &StateIndex,
) -> Assembly {
    let mut unassigned = UnassignedCounts::default();

    let mut farms: Vec<Farm> = farm_rows.into_iter().map(Farm::from_record).collect();
    let farm_slots: HashMap<Uuid, usize> = farms
        .iter()
        .enumerate()
        .map(|(slot, farm)| (farm.id, slot))
        .collect();

    // Lots attach by farm id only.
    let mut lot_slots: HashMap<Uuid, (usize, usize)> = HashMap::new();
    for row in lot_rows {
        let Some(&farm_slot) = row.farm_id.as_ref().and_then(|id| farm_slots.get(id)) else {
            unassigned.lots += 1;
            continue;
        };
        let lot = Lot::from_record(row);
        lot_slots.insert(lot.id, (farm_slot, farms[farm_slot].lots.len()));
        farms[farm_slot].lots.push(lot);
    }

    // Name keys in attach order, so fallback matches follow input order.
    let lot_keys: Vec<(String, (usize, usize))> = farms
        .iter()
        .enumerate()
        .flat_map(|(farm_slot, farm)| {
            farm.lots
                .iter()
                .enumerate()
                .map(move |(lot_slot, lot)| (normalize(&lot.name), (farm_slot, lot_slot)))
        })
        .collect();

    let mut crop_slots: HashMap<Uuid, (usize, usize, usize)> = HashMap::new();
    let mut placements: Vec<((usize, usize), Crop)> = Vec::new();
    for row in crop_rows {
        match resolve_crop_lot(&row, &lot_slots, &lot_keys, &farms) {
            Some(slot) => placements.push((slot, Crop::from_record(row))),
            None => unassigned.crops += 1,
        }
    }
    for ((farm_slot, lot_slot), crop) in placements {
        let lot = &mut farms[farm_slot].lots[lot_slot];
        crop_slots.insert(crop.id, (farm_slot, lot_slot, lot.crops.len()));
        lot.crops.push(crop);
    }

    // Trees attach by crop id only, no fallback.
    for row in tree_rows {
        let Some(&(farm_slot, lot_slot, crop_slot)) =
            row.crop_id.as_ref().and_then(|id| crop_slots.get(id))
        else {
            unassigned.trees += 1;
            continue;
        };
        let tree = Tree::from_record(row, states);
        farms[farm_slot].lots[lot_slot].crops[crop_slot].trees.push(tree);
    }

    Assembly { farms, unassigned }
}

fn resolve_crop_lot(
    row: &CropRecord,
    lot_slots: &HashMap<Uuid, (usize, usize)>,
    lot_keys: &[(String, (usize, usize))],
    farms: &[Farm],
) -> Option<(usize, usize)> {
    if let Some(slot) = row.lot_id.as_ref().and_then(|id| lot_slots.get(id)) {
        return Some(*slot);
    }

    let prefix_key = normalize(crop_name_prefix(&row.name));
    if !prefix_key.is_empty() {
        if let Some((_, slot)) = lot_keys.iter().find(|(key, _)| *key == prefix_key) {
            return Some(*slot);
        }
    }

    if let Some(swapped) = swapped_name_key(&prefix_key) {
        if let Some((_, slot)) = lot_keys.iter().find(|(key, _)| *key == swapped) {
            return Some(*slot);
        }
    }

    let centroid = row.geometry.as_ref().and_then(geo::ring_centroid)?;
    for (farm_slot, farm) in farms.iter().enumerate() {
        for (lot_slot, lot) in farm.lots.iter().enumerate() {
            if let Some(geometry) = &lot.geometry {
                if geo::contains_position(geometry, centroid) {
                    return Some((farm_slot, lot_slot));
                }
            }
        }
    }
    None
}

/// The lot-designating prefix of a crop name ("Lote 3 - Cultivo C3" → "Lote 3").
pub fn crop_name_prefix(name: &str) -> &str {
    name.split(" - ").next().unwrap_or(name).trim()
}

/// Swap a leading `lote`/`zona` token on an already-normalized name key.
pub fn swapped_name_key(key: &str) -> Option<String> {
    if let Some(rest) = key.strip_prefix("lote ") {
        Some(format!("zona {rest}"))
    } else {
        key.strip_prefix("zona ").map(|rest| format!("lote {rest}"))
    }
}

/// One node of the assembled hierarchy, for recursive visitors.
///
/// An explicit discriminant instead of probing for which child collection a
/// record happens to carry; the counting walk is a plain `match`.
#[derive(Debug, Clone, Copy)]
pub enum HierarchyNode<'a> {
    Farm(&'a Farm),
    Lot(&'a Lot),
    Crop(&'a Crop),
    Tree(&'a Tree),
    Fruit(&'a Fruit),
}

impl<'a> From<&'a Farm> for HierarchyNode<'a> {
    fn from(farm: &'a Farm) -> Self {
        Self::Farm(farm)
    }
}

impl<'a> From<&'a Lot> for HierarchyNode<'a> {
    fn from(lot: &'a Lot) -> Self {
        Self::Lot(lot)
    }
}

impl<'a> From<&'a Crop> for HierarchyNode<'a> {
    fn from(crop: &'a Crop) -> Self {
        Self::Crop(crop)
    }
}

impl<'a> From<&'a Tree> for HierarchyNode<'a> {
    fn from(tree: &'a Tree) -> Self {
        Self::Tree(tree)
    }
}

impl<'a> From<&'a Fruit> for HierarchyNode<'a> {
    fn from(fruit: &'a Fruit) -> Self {
        Self::Fruit(fruit)
    }
}

/// Count fruit states across any set of nodes, at any starting depth.
///
/// The sum of all values equals the number of fruits in the visited subtrees.
pub fn count_states<'a, I>(nodes: I) -> BTreeMap<String, u64>
where
    I: IntoIterator,
    I::Item: Into<HierarchyNode<'a>>,
{
    let mut counts = BTreeMap::new();
    for node in nodes {
        visit_states(node.into(), &mut counts);
    }
    counts
}

fn visit_states(node: HierarchyNode<'_>, counts: &mut BTreeMap<String, u64>) {
    match node {
        HierarchyNode::Farm(farm) => {
            for lot in &farm.lots {
                visit_states(lot.into(), counts);
            }
        }
        HierarchyNode::Lot(lot) => {
            for crop in &lot.crops {
                visit_states(crop.into(), counts);
            }
        }
        HierarchyNode::Crop(crop) => {
            for tree in &crop.trees {
                visit_states(tree.into(), counts);
            }
        }
        HierarchyNode::Tree(tree) => {
            for fruit in &tree.fruits {
                visit_states(fruit.into(), counts);
            }
        }
        HierarchyNode::Fruit(fruit) => {
            *counts.entry(fruit.state.clone()).or_insert(0) += 1;
        }
    }
}

/// Structural census of the given farms, independent of fruit state.
pub fn count_structure(farms: &[Farm]) -> StructureCounts {
    let mut counts = StructureCounts {
        farms: farms.len() as u64,
        ..StructureCounts::default()
    };
    for farm in farms {
        counts.lots += farm.lots.len() as u64;
        for lot in &farm.lots {
            counts.crops += lot.crops.len() as u64;
            for crop in &lot.crops {
                counts.trees += crop.trees.len() as u64;
                for tree in &crop.trees {
                    counts.fruits += tree.fruits.len() as u64;
                }
            }
        }
    }
    counts
}

/// Whether a lot takes part in productivity analysis.
///
/// Administrative areas and lots without a recorded state are excluded.
pub fn is_productive(lot: &Lot) -> bool {
    if normalize(&lot.name).contains("admin") {
        return false;
    }
    match lot.state.as_deref().map(normalize) {
        Some(state) if !state.trim().is_empty() => !state.contains("admin"),
        _ => false,
    }
}

/// The productive lots of the given farms, in input order.
pub fn productive_lots(farms: &[Farm]) -> Vec<&Lot> {
    farms
        .iter()
        .flat_map(|farm| farm.lots.iter())
        .filter(|lot| is_productive(lot))
        .collect()
}

/// Per-state lot-name buckets over a productive-lot set
#[derive(Debug, Clone, Default, Serialize)]
pub struct ZoneStats {
    #[serde(rename = "inmaduro")]
    pub immature: Vec<String>,
    #[serde(rename = "transicion")]
    pub transition: Vec<String>,
    #[serde(rename = "maduro")]
    pub mature: Vec<String>,
    #[serde(rename = "enfermo")]
    pub diseased: Vec<String>,
    pub total: u64,
}

impl ZoneStats {
    pub fn from_lots<'a, I>(lots: I) -> Self
    where
        I: IntoIterator<Item = &'a Lot>,
    {
        let mut stats = Self::default();
        for lot in lots {
            stats.total += 1;
            let Some(state) = lot.state.as_deref() else {
                continue;
            };
            match normalize(state).as_str() {
                "inmaduro" => stats.immature.push(lot.name.clone()),
                "transicion" => stats.transition.push(lot.name.clone()),
                "maduro" => stats.mature.push(lot.name.clone()),
                "enfermo" => stats.diseased.push(lot.name.clone()),
                _ => {}
            }
        }
        stats
    }

    /// Share of productive lots in an advanced stage (mature or transition),
    /// as a percentage. `None` when there are no productive lots.
    pub fn advanced_share_percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let advanced = (self.mature.len() + self.transition.len()) as f64;
        Some(advanced / self.total as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StateLabel;
    use geojson::{Geometry, Value};

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn states() -> StateIndex {
        StateIndex::from_labels(&[
            StateLabel {
                id: uuid(901),
                name: "maduro".to_string(),
            },
            StateLabel {
                id: uuid(902),
                name: "enfermo".to_string(),
            },
        ])
    }

    fn farm_row(n: u128, name: &str) -> FarmRecord {
        FarmRecord {
            id: uuid(n),
            name: name.to_string(),
            created_at: None,
        }
    }

    fn lot_row(n: u128, farm: u128, name: &str) -> LotRecord {
        LotRecord {
            id: uuid(n),
            name: name.to_string(),
            farm_id: Some(uuid(farm)),
            state: Some("maduro".to_string()),
            geometry: None,
        }
    }

    fn crop_row(n: u128, lot: Option<u128>, name: &str) -> CropRecord {
        CropRecord {
            id: uuid(n),
            name: name.to_string(),
            species: Some("Cacao".to_string()),
            lot_id: lot.map(uuid),
            geometry: None,
        }
    }

    fn tree_row(n: u128, crop: Option<u128>, fruit_states: &[Option<&str>]) -> TreeRecord {
        TreeRecord {
            id: uuid(n),
            crop_id: crop.map(uuid),
            name: Some(format!("Arbol {n}")),
            species: Some("CH13".to_string()),
            state: None,
            location: None,
            fruits: fruit_states
                .iter()
                .enumerate()
                .map(|(i, state)| crate::models::FruitRecord {
                    id: uuid(n * 100 + i as u128),
                    tree_id: Some(uuid(n)),
                    species: None,
                    state: state.map(str::to_string),
                    created_at: None,
                })
                .collect(),
        }
    }

    fn square(origin: (f64, f64), size: f64) -> Geometry {
        let (x, y) = origin;
        Geometry::new(Value::Polygon(vec![vec![
            vec![x, y],
            vec![x + size, y],
            vec![x + size, y + size],
            vec![x, y + size],
            vec![x, y],
        ]]))
    }

    #[test]
    fn test_assemble_attaches_by_declared_ids() {
        let assembly = assemble(
            vec![farm_row(1, "Finca Uno")],
            vec![lot_row(11, 1, "Lote 1")],
            vec![crop_row(21, Some(11), "Lote 1 - Cultivo A")],
            vec![tree_row(31, Some(21), &[Some("maduro")])],
            &states(),
        );
        assert!(assembly.unassigned.is_empty());
        assert_eq!(assembly.farms.len(), 1);
        assert_eq!(assembly.farms[0].lots[0].crops[0].trees.len(), 1);
    }

    #[test]
    fn test_crop_falls_back_to_name_prefix() {
        let assembly = assemble(
            vec![farm_row(1, "Finca Uno")],
            vec![lot_row(11, 1, "Lote 3")],
            vec![crop_row(21, None, "Lote 3 - Cultivo C3")],
            vec![],
            &states(),
        );
        assert_eq!(assembly.unassigned.crops, 0);
        assert_eq!(assembly.farms[0].lots[0].crops.len(), 1);
    }

    #[test]
    fn test_crop_falls_back_to_zona_token_swap() {
        let assembly = assemble(
            vec![farm_row(1, "Finca Uno")],
            vec![lot_row(11, 1, "Zona 3")],
            vec![crop_row(21, None, "Lote 3 - Cultivo C3")],
            vec![],
            &states(),
        );
        assert_eq!(assembly.unassigned.crops, 0);
        assert_eq!(assembly.farms[0].lots[0].crops.len(), 1);
    }

    #[test]
    fn test_crop_falls_back_to_spatial_containment() {
        let mut lot = lot_row(11, 1, "Zona Verde");
        lot.geometry = Some(square((-73.64, 6.81), 0.02));
        let mut crop = crop_row(21, Some(999), "Parcela nueva");
        crop.geometry = Some(square((-73.635, 6.815), 0.002));
        let assembly = assemble(
            vec![farm_row(1, "Finca Uno")],
            vec![lot],
            vec![crop],
            vec![],
            &states(),
        );
        assert_eq!(assembly.unassigned.crops, 0);
        assert_eq!(assembly.farms[0].lots[0].crops.len(), 1);
    }

    #[test]
    fn test_orphans_are_counted_not_attached() {
        let assembly = assemble(
            vec![farm_row(1, "Finca Uno")],
            vec![
                lot_row(11, 1, "Lote 1"),
                lot_row(12, 2, "Lote huérfano"),
            ],
            vec![crop_row(21, Some(999), "Sin pista")],
            vec![tree_row(31, Some(888), &[])],
            &states(),
        );
        assert_eq!(assembly.unassigned.lots, 1);
        assert_eq!(assembly.unassigned.crops, 1);
        assert_eq!(assembly.unassigned.trees, 1);
        assert_eq!(count_structure(&assembly.farms).crops, 0);
    }

    #[test]
    fn test_count_states_buckets_unknowns() {
        let assembly = assemble(
            vec![farm_row(1, "Finca Uno")],
            vec![lot_row(11, 1, "Lote 1")],
            vec![crop_row(21, Some(11), "Lote 1 - Cultivo A")],
            vec![tree_row(
                31,
                Some(21),
                &[Some("maduro"), Some("maduro"), Some("enfermo"), None],
            )],
            &states(),
        );
        let counts = count_states(&assembly.farms);
        assert_eq!(counts.get("maduro"), Some(&2));
        assert_eq!(counts.get("enfermo"), Some(&1));
        assert_eq!(counts.get("Desconocido"), Some(&1));
        assert_eq!(counts.values().sum::<u64>(), 4);
    }

    #[test]
    fn test_count_states_from_any_depth() {
        let assembly = assemble(
            vec![farm_row(1, "Finca Uno")],
            vec![lot_row(11, 1, "Lote 1")],
            vec![crop_row(21, Some(11), "Lote 1 - Cultivo A")],
            vec![tree_row(31, Some(21), &[Some("maduro")])],
            &states(),
        );
        let lot = &assembly.farms[0].lots[0];
        let from_lot = count_states([HierarchyNode::from(lot)]);
        let from_tree = count_states(&lot.crops[0].trees);
        assert_eq!(from_lot, from_tree);
    }

    #[test]
    fn test_count_conservation() {
        let assembly = assemble(
            vec![farm_row(1, "Finca Uno")],
            vec![lot_row(11, 1, "Lote 1"), lot_row(12, 1, "Lote 2")],
            vec![
                crop_row(21, Some(11), "Lote 1 - Cultivo A"),
                crop_row(22, Some(12), "Lote 2 - Cultivo B"),
            ],
            vec![
                tree_row(31, Some(21), &[Some("maduro"), None]),
                tree_row(32, Some(22), &[Some("enfermo")]),
            ],
            &states(),
        );
        let total: u64 = count_states(&assembly.farms).values().sum();
        assert_eq!(total, count_structure(&assembly.farms).fruits);
    }

    #[test]
    fn test_productive_lot_filter() {
        let admin = Lot {
            id: uuid(1),
            name: "Administración".to_string(),
            state: Some("".to_string()),
            geometry: None,
            crops: vec![],
        };
        let productive = Lot {
            id: uuid(2),
            name: "Lote 3".to_string(),
            state: Some("maduro".to_string()),
            geometry: None,
            crops: vec![],
        };
        let stateless = Lot {
            id: uuid(3),
            name: "Lote 4".to_string(),
            state: None,
            geometry: None,
            crops: vec![],
        };
        assert!(!is_productive(&admin));
        assert!(is_productive(&productive));
        assert!(!is_productive(&stateless));
    }

    #[test]
    fn test_zone_stats_buckets_and_share() {
        let lots = vec![
            Lot {
                id: uuid(1),
                name: "Lote 1".to_string(),
                state: Some("maduro".to_string()),
                geometry: None,
                crops: vec![],
            },
            Lot {
                id: uuid(2),
                name: "Lote 2".to_string(),
                state: Some("Transición".to_string()),
                geometry: None,
                crops: vec![],
            },
            Lot {
                id: uuid(3),
                name: "Lote 3".to_string(),
                state: Some("inmaduro".to_string()),
                geometry: None,
                crops: vec![],
            },
        ];
        let stats = ZoneStats::from_lots(lots.iter());
        assert_eq!(stats.mature, vec!["Lote 1"]);
        assert_eq!(stats.transition, vec!["Lote 2"]);
        assert_eq!(stats.total, 3);
        let share = stats.advanced_share_percent().unwrap();
        assert!((share - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_crop_name_prefix() {
        assert_eq!(crop_name_prefix("Lote 3 - Cultivo C3"), "Lote 3");
        assert_eq!(crop_name_prefix("Cultivo suelto"), "Cultivo suelto");
    }

    #[test]
    fn test_swapped_name_key() {
        assert_eq!(swapped_name_key("lote 3"), Some("zona 3".to_string()));
        assert_eq!(swapped_name_key("zona 3"), Some("lote 3".to_string()));
        assert_eq!(swapped_name_key("parcela 3"), None);
    }
}
