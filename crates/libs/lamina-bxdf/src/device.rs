//! Handoff of immutable material descriptions from the host to compute
//! contexts.
//!
//! A descriptor lives on the host for the lifetime of the scene. Each compute
//! context owns a [`DeviceSlot`] which receives a plain-data snapshot of the
//! descriptor exactly once; after that the snapshot is shared read-only by
//! every query issued in that context.

use bytemuck::Pod;
use std::sync::OnceLock;

/// Host-side description that can be snapshotted into a device kernel.
pub trait DeviceUpload {
    /// Plain-data evaluator holding a copy of the parameters it needs.
    type Kernel: Pod + Send + Sync;

    /// Copies the parameters into a new kernel.
    fn to_kernel(&self) -> Self::Kernel;

    /// Returns the kernel snapshot as raw bytes, ready to be written into a
    /// device buffer.
    fn kernel_bytes(&self) -> Vec<u8> { bytemuck::bytes_of(&self.to_kernel()).to_vec() }
}

/// Errors raised by a [`DeviceSlot`].
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    /// The slot already holds a kernel.
    #[error("Device slot is already initialized")]
    AlreadyInitialized,
}

/// Lifecycle state of a [`DeviceSlot`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// No kernel uploaded yet.
    Uninitialized,
    /// Kernel uploaded; queries may be issued.
    Ready,
}

/// Per-context storage of a kernel, written once and read concurrently.
///
/// The upload happens-before every successful [`DeviceSlot::get`], on any
/// thread.
#[derive(Debug)]
pub struct DeviceSlot<K> {
    kernel: OnceLock<K>,
}

impl<K> Default for DeviceSlot<K> {
    fn default() -> Self { Self::new() }
}

impl<K> DeviceSlot<K> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            kernel: OnceLock::new(),
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SlotState {
        match self.kernel.get() {
            Some(_) => SlotState::Ready,
            None => SlotState::Uninitialized,
        }
    }

    /// Returns the uploaded kernel, if any.
    pub fn get(&self) -> Option<&K> { self.kernel.get() }
}

impl<K: Pod + Send + Sync> DeviceSlot<K> {
    /// Snapshots `desc` into the slot and returns the ready kernel.
    ///
    /// Only the first upload succeeds; later calls leave the slot untouched.
    pub fn upload<D>(&self, desc: &D) -> Result<&K, SlotError>
    where
        D: DeviceUpload<Kernel = K>,
    {
        let mut uploaded = false;
        let kernel = self.kernel.get_or_init(|| {
            uploaded = true;
            desc.to_kernel()
        });
        if !uploaded {
            return Err(SlotError::AlreadyInitialized);
        }
        log::info!(
            "Uploaded {} bytes to device slot ({})",
            std::mem::size_of::<K>(),
            std::any::type_name::<K>()
        );
        Ok(kernel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Gain {
        value: f32,
    }

    struct Amplifier(f32);

    impl DeviceUpload for Amplifier {
        type Kernel = Gain;

        fn to_kernel(&self) -> Gain { Gain { value: self.0 } }
    }

    #[test]
    fn test_slot_lifecycle() {
        let slot = DeviceSlot::<Gain>::new();
        assert_eq!(slot.state(), SlotState::Uninitialized);
        assert!(slot.get().is_none());

        let kernel = slot.upload(&Amplifier(2.0)).unwrap();
        assert_eq!(kernel.value, 2.0);
        assert_eq!(slot.state(), SlotState::Ready);
    }

    #[test]
    fn test_slot_rejects_second_upload() {
        let slot = DeviceSlot::new();
        slot.upload(&Amplifier(2.0)).unwrap();
        assert!(matches!(
            slot.upload(&Amplifier(3.0)),
            Err(SlotError::AlreadyInitialized)
        ));
        assert_eq!(slot.get().unwrap().value, 2.0);
    }

    #[test]
    fn test_upload_visible_from_other_threads() {
        let slot = DeviceSlot::new();
        slot.upload(&Amplifier(0.5)).unwrap();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_eq!(slot.get().map(|k| k.value), Some(0.5)));
            }
        });
    }

    #[test]
    fn test_kernel_bytes() {
        assert_eq!(Amplifier(1.0).kernel_bytes(), 1.0f32.to_ne_bytes().to_vec());
    }
}
