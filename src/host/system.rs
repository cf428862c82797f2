// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

use parking_lot::Mutex;
use sysinfo::System;

use super::{cpu_ratio_from, memory_ratio_from, HostSampler, SampleError};

/// Reads the real host through `sysinfo`.
pub struct SystemSampler {
    system: Mutex<System>,
    cores: usize,
}

impl SystemSampler {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            cores: num_cpus::get(),
        }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSampler for SystemSampler {
    fn cpu_ratio(&self) -> Result<f64, SampleError> {
        let load = System::load_average();
        cpu_ratio_from(load.one, self.cores)
    }

    fn memory_ratio(&self) -> Result<f64, SampleError> {
        let (total, free) = {
            let mut system = self.system.lock();
            system.refresh_memory();
            (system.total_memory(), system.free_memory())
        };
        memory_ratio_from(total, free)
    }
}
