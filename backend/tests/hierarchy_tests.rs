//! Tests for hierarchy assembly over raw wire-shaped rows
//!
//! Verifies that flat Spanish-named JSON collections assemble into the
//! nested farm tree without losing or duplicating entities, and that the
//! counting operations agree with the structure.

use proptest::prelude::*;
use serde_json::json;

use shared::hierarchy::{assemble, count_states, count_structure};
use shared::models::{CropRecord, FarmRecord, LotRecord, StateIndex, StateLabel, TreeRecord};

fn uuid(n: u128) -> uuid::Uuid {
    uuid::Uuid::from_u128(n)
}

fn state_index() -> StateIndex {
    StateIndex::from_labels(&[
        StateLabel {
            id: uuid(901),
            name: "maduro".to_string(),
        },
        StateLabel {
            id: uuid(902),
            name: "inmaduro".to_string(),
        },
    ])
}

// =============================================================================
// Wire-shape assembly
// =============================================================================

mod wire_shapes {
    use super::*;

    #[test]
    fn assembles_from_spanish_wire_rows() {
        let farms: Vec<FarmRecord> = serde_json::from_value(json!([
            { "finca_id": uuid(1), "nombre": "Finca Uno", "created_at": "2024-05-01T10:00:00Z" }
        ]))
        .unwrap();
        let lots: Vec<LotRecord> = serde_json::from_value(json!([
            { "lote_id": uuid(11), "nombre": "Lote 1", "finca_id": uuid(1), "estado": "maduro" }
        ]))
        .unwrap();
        let crops: Vec<CropRecord> = serde_json::from_value(json!([
            { "cultivo_id": uuid(21), "nombre": "Lote 1 - Cultivo A", "lote_id": uuid(11) }
        ]))
        .unwrap();
        let trees: Vec<TreeRecord> = serde_json::from_value(json!([
            {
                "arbol_id": uuid(31),
                "cultivo_id": uuid(21),
                "nombre": "Arbol 1",
                "frutos": [
                    { "fruto_id": uuid(41), "estado_fruto": uuid(901) },
                    { "fruto_id": uuid(42), "estado_fruto": "inmaduro" },
                    { "fruto_id": uuid(43) }
                ]
            }
        ]))
        .unwrap();

        let assembly = assemble(farms, lots, crops, trees, &state_index());
        assert!(assembly.unassigned.is_empty());

        let counts = count_states(&assembly.farms);
        assert_eq!(counts.get("maduro"), Some(&1));
        assert_eq!(counts.get("inmaduro"), Some(&1));
        assert_eq!(counts.get("Desconocido"), Some(&1));
    }

    #[test]
    fn accepts_singular_fruit_key_from_joined_queries() {
        let trees: Vec<TreeRecord> = serde_json::from_value(json!([
            {
                "arbol_id": uuid(31),
                "cultivo_id": uuid(21),
                "fruto": [ { "fruto_id": uuid(41), "estado_fruto": "maduro" } ]
            }
        ]))
        .unwrap();
        assert_eq!(trees[0].fruits.len(), 1);
    }
}

// =============================================================================
// Structural round-trip: nothing lost or duplicated except flagged orphans
// =============================================================================

mod round_trip {
    use super::*;

    #[test]
    fn structure_matches_flat_inputs() {
        let farms = vec![FarmRecord {
            id: uuid(1),
            name: "Finca Uno".to_string(),
            created_at: None,
        }];
        let lots: Vec<LotRecord> = (0..3)
            .map(|i| LotRecord {
                id: uuid(10 + i),
                name: format!("Lote {i}"),
                farm_id: Some(uuid(1)),
                state: Some("maduro".to_string()),
                geometry: None,
            })
            .collect();
        let crops: Vec<CropRecord> = (0..3)
            .map(|i| CropRecord {
                id: uuid(20 + i),
                name: format!("Lote {i} - Cultivo"),
                species: None,
                lot_id: Some(uuid(10 + i)),
                geometry: None,
            })
            .collect();
        let trees: Vec<TreeRecord> = (0..6)
            .map(|i| TreeRecord {
                id: uuid(30 + i),
                crop_id: Some(uuid(20 + i % 3)),
                name: None,
                species: None,
                state: None,
                location: None,
                fruits: vec![],
            })
            .collect();

        let assembly = assemble(farms, lots, crops, trees, &state_index());
        let structure = count_structure(&assembly.farms);
        assert_eq!(structure.farms, 1);
        assert_eq!(structure.lots, 3);
        assert_eq!(structure.crops, 3);
        assert_eq!(structure.trees, 6);
        assert_eq!(structure.fruits, 0);
    }

    #[test]
    fn orphans_reduce_structure_and_raise_diagnostics() {
        let farms = vec![FarmRecord {
            id: uuid(1),
            name: "Finca Uno".to_string(),
            created_at: None,
        }];
        let lots = vec![
            LotRecord {
                id: uuid(11),
                name: "Lote 1".to_string(),
                farm_id: Some(uuid(1)),
                state: None,
                geometry: None,
            },
            LotRecord {
                id: uuid(12),
                name: "Lote perdido".to_string(),
                farm_id: Some(uuid(77)),
                state: None,
                geometry: None,
            },
        ];
        let trees = vec![TreeRecord {
            id: uuid(31),
            crop_id: Some(uuid(555)),
            name: None,
            species: None,
            state: None,
            location: None,
            fruits: vec![],
        }];

        let assembly = assemble(farms, lots, vec![], trees, &state_index());
        let structure = count_structure(&assembly.farms);
        assert_eq!(structure.lots, 1);
        assert_eq!(structure.trees, 0);
        assert_eq!(assembly.unassigned.lots, 1);
        assert_eq!(assembly.unassigned.trees, 1);
    }
}

// =============================================================================
// Count conservation: sum of state counts equals fruit census
// =============================================================================

proptest! {
    #[test]
    fn count_conservation_holds(
        lots_per_farm in 0usize..4,
        crops_per_lot in 0usize..4,
        trees_per_crop in 0usize..4,
        fruits_per_tree in 0usize..5,
    ) {
        let farms = vec![FarmRecord {
            id: uuid(1),
            name: "Finca".to_string(),
            created_at: None,
        }];
        let mut lots = Vec::new();
        let mut crops = Vec::new();
        let mut trees = Vec::new();
        let states = ["maduro", "inmaduro", "transicion", "enfermo"];

        let mut next = 100u128;
        for l in 0..lots_per_farm {
            let lot_id = next;
            next += 1;
            lots.push(LotRecord {
                id: uuid(lot_id),
                name: format!("Lote {l}"),
                farm_id: Some(uuid(1)),
                state: None,
                geometry: None,
            });
            for _ in 0..crops_per_lot {
                let crop_id = next;
                next += 1;
                crops.push(CropRecord {
                    id: uuid(crop_id),
                    name: format!("Lote {l} - Cultivo"),
                    species: None,
                    lot_id: Some(uuid(lot_id)),
                    geometry: None,
                });
                for _ in 0..trees_per_crop {
                    let tree_id = next;
                    next += 1;
                    let fruits = (0..fruits_per_tree)
                        .map(|f| {
                            let fruit_id = next + f as u128;
                            shared::models::FruitRecord {
                                id: uuid(fruit_id),
                                tree_id: Some(uuid(tree_id)),
                                species: None,
                                state: Some(states[f % states.len()].to_string()),
                                created_at: None,
                            }
                        })
                        .collect();
                    next += fruits_per_tree as u128;
                    trees.push(TreeRecord {
                        id: uuid(tree_id),
                        crop_id: Some(uuid(crop_id)),
                        name: None,
                        species: None,
                        state: None,
                        location: None,
                        fruits,
                    });
                }
            }
        }

        let assembly = assemble(farms, lots, crops, trees, &state_index());
        let total_states: u64 = count_states(&assembly.farms).values().sum();
        let structure = count_structure(&assembly.farms);
        prop_assert_eq!(total_states, structure.fruits);
        prop_assert_eq!(
            structure.fruits,
            (lots_per_farm * crops_per_lot * trees_per_crop * fruits_per_tree) as u64
        );
    }
}
