use std::collections::HashMap;

use eframe::egui::Color32;

use crate::net::Partition;

/// Fill for states absent from the partition.
pub(super) const DEFAULT_FILL: Color32 = Color32::WHITE;

const PALETTE_SIZE: usize = 9;

// ColorBrewer sequential schemes, 9-class: BuPu, OrRd, YlGn, Greys.
const PALETTES: [[Color32; PALETTE_SIZE]; 4] = [
    [
        Color32::from_rgb(0xf7, 0xfc, 0xfd),
        Color32::from_rgb(0xe0, 0xec, 0xf4),
        Color32::from_rgb(0xbf, 0xd3, 0xe6),
        Color32::from_rgb(0x9e, 0xbc, 0xda),
        Color32::from_rgb(0x8c, 0x96, 0xc6),
        Color32::from_rgb(0x8c, 0x6b, 0xb1),
        Color32::from_rgb(0x88, 0x41, 0x9d),
        Color32::from_rgb(0x81, 0x0f, 0x7c),
        Color32::from_rgb(0x4d, 0x00, 0x4b),
    ],
    [
        Color32::from_rgb(0xff, 0xf7, 0xec),
        Color32::from_rgb(0xfe, 0xe8, 0xc8),
        Color32::from_rgb(0xfd, 0xd4, 0x9e),
        Color32::from_rgb(0xfd, 0xbb, 0x84),
        Color32::from_rgb(0xfc, 0x8d, 0x59),
        Color32::from_rgb(0xef, 0x65, 0x48),
        Color32::from_rgb(0xd7, 0x30, 0x1f),
        Color32::from_rgb(0xb3, 0x00, 0x00),
        Color32::from_rgb(0x7f, 0x00, 0x00),
    ],
    [
        Color32::from_rgb(0xff, 0xff, 0xe5),
        Color32::from_rgb(0xf7, 0xfc, 0xb9),
        Color32::from_rgb(0xd9, 0xf0, 0xa3),
        Color32::from_rgb(0xad, 0xdd, 0x8e),
        Color32::from_rgb(0x78, 0xc6, 0x79),
        Color32::from_rgb(0x41, 0xab, 0x5d),
        Color32::from_rgb(0x23, 0x84, 0x43),
        Color32::from_rgb(0x00, 0x68, 0x37),
        Color32::from_rgb(0x00, 0x45, 0x29),
    ],
    [
        Color32::from_rgb(0xff, 0xff, 0xff),
        Color32::from_rgb(0xf0, 0xf0, 0xf0),
        Color32::from_rgb(0xd9, 0xd9, 0xd9),
        Color32::from_rgb(0xbd, 0xbd, 0xbd),
        Color32::from_rgb(0x96, 0x96, 0x96),
        Color32::from_rgb(0x73, 0x73, 0x73),
        Color32::from_rgb(0x52, 0x52, 0x52),
        Color32::from_rgb(0x25, 0x25, 0x25),
        Color32::from_rgb(0x00, 0x00, 0x00),
    ],
];

/// Hierarchical color assignment from a cluster partition. The smallest top
/// cluster id present maps to palette 0 and ids proceed consecutively,
/// clamping to the last palette beyond that.
pub(super) struct StatePalette {
    paths: HashMap<u32, Vec<u32>>,
    smallest_cluster: u32,
}

impl StatePalette {
    pub fn from_partition(partition: &Partition) -> Self {
        let paths: HashMap<u32, Vec<u32>> = partition
            .nodes
            .iter()
            .filter_map(|node| Some((node.state_id?, node.path.clone())))
            .collect();
        let smallest_cluster = paths
            .values()
            .filter_map(|path| path.first().copied())
            .min()
            .unwrap_or(0);
        Self {
            paths,
            smallest_cluster,
        }
    }

    pub fn empty() -> Self {
        Self {
            paths: HashMap::new(),
            smallest_cluster: 0,
        }
    }

    pub fn fill_for(&self, state_id: u32) -> Color32 {
        let Some(path) = self.paths.get(&state_id) else {
            return DEFAULT_FILL;
        };

        let palette_index =
            ((path[0].saturating_sub(self.smallest_cluster)) as usize).min(PALETTES.len() - 1);
        let palette = &PALETTES[palette_index];
        let color_index = if path.len() > 2 {
            (2 + path[1] as usize) % PALETTE_SIZE
        } else {
            2
        };
        palette[color_index]
    }
}
