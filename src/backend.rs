//! Write-back of structure plans
//!
//! The planner never touches a world directly. A `PlacementBackend` receives
//! primitives in emission order; two are provided here:
//! - `VoxelBuffer`: in-memory sparse voxel store, used by tests and the CLI
//!   summary
//! - `CommandScriptWriter`: one game command per line

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use crate::error::BackendError;
use crate::plan::{Block, Pos, Primitive, StructurePlan};

/// Receiver of plan primitives.
///
/// Implementations must apply writes in call order so that later writes
/// overwrite earlier ones.
pub trait PlacementBackend {
    fn place_block(&mut self, pos: Pos, block: &Block) -> Result<(), BackendError>;

    /// Fill an inclusive box with `from <= to` on every axis.
    fn fill_box(&mut self, from: Pos, to: Pos, block: &Block) -> Result<(), BackendError> {
        for x in from[0]..=to[0] {
            for y in from[1]..=to[1] {
                for z in from[2]..=to[2] {
                    self.place_block([x, y, z], block)?;
                }
            }
        }
        Ok(())
    }

    fn summon(
        &mut self,
        pos: Pos,
        entity: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), BackendError>;
}

/// Send every primitive of a plan to a backend, in order.
pub fn apply_plan<B: PlacementBackend>(plan: &StructurePlan, backend: &mut B) -> Result<(), BackendError> {
    for primitive in plan.primitives() {
        match primitive {
            Primitive::FillBox { from, to, block } => backend.fill_box(*from, *to, block)?,
            Primitive::SetBlock { pos, block } => backend.place_block(*pos, block)?,
            Primitive::Summon { pos, entity, properties } => backend.summon(*pos, entity, properties)?,
        }
    }
    log::debug!("Applied {} primitives", plan.len());
    Ok(())
}

// =============================================================================
// IN-MEMORY BACKEND
// =============================================================================

/// A spawned entity recorded by `VoxelBuffer`.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub pos: Pos,
    pub kind: String,
    pub properties: BTreeMap<String, String>,
}

/// Sparse voxel store. Air writes are recorded like any other block, so a
/// cleared position reads back as air rather than as untouched.
#[derive(Clone, Debug, Default)]
pub struct VoxelBuffer {
    blocks: HashMap<Pos, Block>,
    entities: Vec<Entity>,
    writes: u64,
}

impl VoxelBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Material last written at a position.
    pub fn material_at(&self, pos: Pos) -> Option<&str> {
        self.blocks.get(&pos).map(|b| b.material.as_str())
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Positions holding a non-air block.
    pub fn solid_count(&self) -> usize {
        self.blocks.values().filter(|b| !b.is_air()).count()
    }

    /// Total block writes received, including overwrites.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Count of non-air blocks per material.
    pub fn material_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for block in self.blocks.values().filter(|b| !b.is_air()) {
            *counts.entry(block.material.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl PlacementBackend for VoxelBuffer {
    fn place_block(&mut self, pos: Pos, block: &Block) -> Result<(), BackendError> {
        self.blocks.insert(pos, block.clone());
        self.writes += 1;
        Ok(())
    }

    fn summon(
        &mut self,
        pos: Pos,
        entity: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), BackendError> {
        self.entities.push(Entity {
            pos,
            kind: entity.to_string(),
            properties: properties.clone(),
        });
        Ok(())
    }
}

// =============================================================================
// COMMAND SCRIPT
// =============================================================================

/// Writes `fill`, `setblock` and `summon` commands, one per line.
///
/// Boxes are emitted as a single `fill` rather than expanded per block.
pub struct CommandScriptWriter<W: Write> {
    out: W,
    namespace: String,
    lines: usize,
}

impl<W: Write> CommandScriptWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_namespace(out, "minecraft")
    }

    pub fn with_namespace(out: W, namespace: &str) -> Self {
        Self {
            out,
            namespace: namespace.to_string(),
            lines: 0,
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn state(&self, block: &Block) -> String {
        format!("{}:{}", self.namespace, block.state_string())
    }

    fn line(&mut self, line: &str) -> Result<(), BackendError> {
        writeln!(self.out, "{}", line)?;
        self.lines += 1;
        Ok(())
    }
}

impl<W: Write> PlacementBackend for CommandScriptWriter<W> {
    fn place_block(&mut self, pos: Pos, block: &Block) -> Result<(), BackendError> {
        let line = format!("setblock {} {} {} {}", pos[0], pos[1], pos[2], self.state(block));
        self.line(&line)
    }

    fn fill_box(&mut self, from: Pos, to: Pos, block: &Block) -> Result<(), BackendError> {
        let line = format!(
            "fill {} {} {} {} {} {} {}",
            from[0],
            from[1],
            from[2],
            to[0],
            to[1],
            to[2],
            self.state(block)
        );
        self.line(&line)
    }

    fn summon(
        &mut self,
        pos: Pos,
        entity: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), BackendError> {
        let mut line = format!("summon {}:{} {} {} {}", self.namespace, entity, pos[0], pos[1], pos[2]);
        if !properties.is_empty() {
            let tags: Vec<String> = properties
                .iter()
                .map(|(k, v)| format!("{}:\"{}:{}\"", k, self.namespace, v))
                .collect();
            line.push_str(&format!(" {{{}}}", tags.join(",")));
        }
        self.line(&line)
    }
}
