use anyhow::{Context, Result};

use super::wgpu_backend::WgpuMeshBackend;

/// Adapter selection for [`Gpu::new_headless`].
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,
    /// Only a software adapter is accepted (CI machines without a GPU).
    pub force_fallback_adapter: bool,
    pub backends: wgpu::Backends,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            backends: wgpu::Backends::all(),
        }
    }
}

/// Device and queue with no presentation surface. Mesh buffers live here;
/// swapchains belong to the host.
pub struct Gpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    pub async fn new_headless(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .with_context(|| format!("no GPU adapter (fallback only: {})", init.force_fallback_adapter))?;

        let info = adapter.get_info();
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("quill mesh device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .with_context(|| format!("device creation failed on {}", info.name))?;

        log::info!("mesh device on {} ({:?})", info.name, info.backend);
        Ok(Gpu { adapter, device, queue })
    }

    /// [`Gpu::new_headless`] driven to completion on the current thread.
    pub fn new_headless_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new_headless(init))
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn mesh_backend(&self) -> WgpuMeshBackend {
        WgpuMeshBackend::new(self.device.clone())
    }
}
