/// Occupancy of the queueing system. Mutated only by event application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemState {
    /// Servers currently holding a customer, `0..=k`
    pub servers_busy: u32,
    /// Customers waiting for a free server
    pub queue_length: u64,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_idle_server(&self, servers: u32) -> bool {
        self.servers_busy < servers
    }

    /// Customers either waiting or in service
    pub fn in_system(&self) -> u64 {
        self.queue_length + u64::from(self.servers_busy)
    }
}
