//! Structure plan: the ordered list of primitives handed to a placement backend
//!
//! Every coordinate in a plan is absolute. Primitives are applied in emission
//! order and later ones may overwrite earlier ones.

use std::collections::BTreeMap;

use serde::Serialize;

/// Absolute block position `(x, y, z)`.
pub type Pos = [i32; 3];

/// A material tag with its block state properties.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Block {
    pub material: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Block {
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn air() -> Self {
        Self::new("air")
    }

    pub fn is_air(&self) -> bool {
        self.material == "air"
    }

    /// `material[key=value,...]` as used in game commands.
    pub fn state_string(&self) -> String {
        if self.properties.is_empty() {
            return self.material.clone();
        }
        let props: Vec<String> = self.properties.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{}[{}]", self.material, props.join(","))
    }
}

/// One geometric write.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Fill the inclusive box between two corners
    FillBox { from: Pos, to: Pos, block: Block },
    /// Set a single block
    SetBlock { pos: Pos, block: Block },
    /// Spawn an entity with a property map (e.g. a cat variant)
    Summon {
        pos: Pos,
        entity: String,
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        properties: BTreeMap<String, String>,
    },
}

impl Primitive {
    /// Number of block positions written (entities count as zero).
    pub fn volume(&self) -> u64 {
        match self {
            Primitive::FillBox { from, to, .. } => (0..3)
                .map(|i| ((from[i] - to[i]).unsigned_abs() + 1) as u64)
                .product(),
            Primitive::SetBlock { .. } => 1,
            Primitive::Summon { .. } => 0,
        }
    }

    pub fn block(&self) -> Option<&Block> {
        match self {
            Primitive::FillBox { block, .. } | Primitive::SetBlock { block, .. } => Some(block),
            Primitive::Summon { .. } => None,
        }
    }
}

/// Labelled group of primitives, in emission order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanSection {
    pub name: &'static str,
    pub start: usize,
    pub len: usize,
}

/// Ordered, append-only sequence of primitives.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StructurePlan {
    primitives: Vec<Primitive>,
    sections: Vec<PlanSection>,
}

impl StructurePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a named section; following primitives belong to it.
    pub fn begin_section(&mut self, name: &'static str) {
        self.sections.push(PlanSection {
            name,
            start: self.primitives.len(),
            len: 0,
        });
    }

    fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
        if let Some(section) = self.sections.last_mut() {
            section.len += 1;
        }
    }

    /// Append a box fill; corners may be given in any order.
    pub fn fill(&mut self, a: Pos, b: Pos, block: Block) {
        let from = [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])];
        let to = [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])];
        self.push(Primitive::FillBox { from, to, block });
    }

    pub fn set(&mut self, pos: Pos, block: Block) {
        self.push(Primitive::SetBlock { pos, block });
    }

    pub fn summon(&mut self, pos: Pos, entity: &str, properties: BTreeMap<String, String>) {
        self.push(Primitive::Summon {
            pos,
            entity: entity.to_string(),
            properties,
        });
    }

    /// Append another plan's primitives and sections after this one's.
    pub fn extend(&mut self, other: StructurePlan) {
        let offset = self.primitives.len();
        self.sections.extend(other.sections.into_iter().map(|mut s| {
            s.start += offset;
            s
        }));
        self.primitives.extend(other.primitives);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn sections(&self) -> &[PlanSection] {
        &self.sections
    }

    /// Primitives of the first section with this name.
    pub fn section(&self, name: &str) -> Option<&[Primitive]> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| &self.primitives[s.start..s.start + s.len])
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn total_volume(&self) -> u64 {
        self.primitives.iter().map(Primitive::volume).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_normalizes_corners() {
        let mut plan = StructurePlan::new();
        plan.fill([5, 70, -2], [1, 64, 3], Block::new("stone"));
        assert_eq!(
            plan.primitives()[0],
            Primitive::FillBox {
                from: [1, 64, -2],
                to: [5, 70, 3],
                block: Block::new("stone"),
            }
        );
        assert_eq!(plan.total_volume(), 5 * 7 * 6);
    }

    #[test]
    fn test_state_string_sorts_properties() {
        let block = Block::new("oak_door").with("half", "lower").with("facing", "north");
        assert_eq!(block.state_string(), "oak_door[facing=north,half=lower]");
        assert_eq!(Block::new("stone").state_string(), "stone");
    }

    #[test]
    fn test_sections_track_ranges_across_extend() {
        let mut plan = StructurePlan::new();
        plan.begin_section("foundation");
        plan.set([0, 0, 0], Block::new("stone"));

        let mut extra = StructurePlan::new();
        extra.begin_section("decor");
        extra.set([1, 1, 1], Block::new("chest"));
        extra.set([2, 1, 1], Block::new("barrel"));
        plan.extend(extra);

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.section("foundation").unwrap().len(), 1);
        let decor = plan.section("decor").unwrap();
        assert_eq!(decor.len(), 2);
        assert_eq!(decor[0].block().unwrap().material, "chest");
    }

    #[test]
    fn test_json_shape() {
        let mut plan = StructurePlan::new();
        plan.set([1, 2, 3], Block::new("campfire"));
        let json = plan.to_json().unwrap();
        assert!(json.contains("\"kind\": \"set_block\""));
        assert!(json.contains("\"material\": \"campfire\""));
        assert!(!json.contains("properties"));
    }
}
