//! Render sink interface.
//!
//! Render-resource creation is an external collaborator: the scatter
//! core only describes instance batches through this trait and never
//! touches GPU resources itself. `RecordingSink` is the in-memory
//! implementation used by the CLI export path and the tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::density::Rgba;
use crate::placement::InstanceTransform;

/// Color of batch slots that were never written.
pub const DEFAULT_INSTANCE_COLOR: Rgba = [1.0, 1.0, 1.0, 1.0];

/// Opaque handle to a created instance batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchHandle(pub u64);

/// Opaque material reference, owned by the host's asset layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialHandle(pub String);

impl MaterialHandle {
    pub fn named(name: &str) -> Self {
        MaterialHandle(name.to_string())
    }
}

/// Receiver for render-ready placement output.
///
/// The core creates one batch per activated chunk, writes accepted
/// slots by index, and attaches the batch once. There is no removal
/// or update API.
pub trait RenderSink {
    /// Allocate an instance batch with `capacity` slots, all at the
    /// identity transform and default color.
    fn create_instance_batch(
        &mut self,
        name: &str,
        position: [f32; 3],
        material: &MaterialHandle,
        capacity: usize,
    ) -> BatchHandle;

    /// Write one instance slot. Indices outside the capacity are a
    /// caller bug.
    fn set_instance(
        &mut self,
        handle: BatchHandle,
        index: usize,
        transform: InstanceTransform,
        color: Rgba,
    );

    /// Make the batch visible in the host scene.
    fn attach_to_scene(&mut self, handle: BatchHandle);
}

/// One batch as captured by [`RecordingSink`].
#[derive(Clone, Debug)]
pub struct RecordedBatch {
    pub handle: BatchHandle,
    pub name: String,
    pub position: [f32; 3],
    pub material: MaterialHandle,
    pub capacity: usize,
    /// `None` slots were never written and sit at batch defaults.
    pub instances: Vec<Option<(InstanceTransform, Rgba)>>,
    pub attached: bool,
}

impl RecordedBatch {
    /// Slot contents with defaults filled in.
    pub fn instance(&self, index: usize) -> (InstanceTransform, Rgba) {
        self.instances[index].unwrap_or((InstanceTransform::IDENTITY, DEFAULT_INSTANCE_COLOR))
    }

    pub fn written_count(&self) -> usize {
        self.instances.iter().filter(|s| s.is_some()).count()
    }
}

/// In-memory render sink.
#[derive(Default)]
pub struct RecordingSink {
    next_handle: u64,
    batches: HashMap<BatchHandle, RecordedBatch>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(&self, handle: BatchHandle) -> Option<&RecordedBatch> {
        self.batches.get(&handle)
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn batches(&self) -> impl Iterator<Item = &RecordedBatch> {
        self.batches.values()
    }
}

impl RenderSink for RecordingSink {
    fn create_instance_batch(
        &mut self,
        name: &str,
        position: [f32; 3],
        material: &MaterialHandle,
        capacity: usize,
    ) -> BatchHandle {
        let handle = BatchHandle(self.next_handle);
        self.next_handle += 1;
        self.batches.insert(
            handle,
            RecordedBatch {
                handle,
                name: name.to_string(),
                position,
                material: material.clone(),
                capacity,
                instances: vec![None; capacity],
                attached: false,
            },
        );
        handle
    }

    fn set_instance(
        &mut self,
        handle: BatchHandle,
        index: usize,
        transform: InstanceTransform,
        color: Rgba,
    ) {
        if let Some(batch) = self.batches.get_mut(&handle) {
            batch.instances[index] = Some((transform, color));
        }
    }

    fn attach_to_scene(&mut self, handle: BatchHandle) {
        if let Some(batch) = self.batches.get_mut(&handle) {
            batch.attached = true;
        }
    }
}
