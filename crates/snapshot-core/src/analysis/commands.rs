use std::collections::BTreeMap;

use crate::protocol::command::CommandDescriptor;
use crate::{CommandSummary, DeviceErrorCount};

#[derive(Debug)]
pub(crate) struct CommandStats {
    pub descriptor: CommandDescriptor,
    pub notifications: u64,
    pub responses: u64,
    pub device_errors: BTreeMap<u8, u64>,
}

impl CommandStats {
    pub fn new(descriptor: CommandDescriptor) -> Self {
        Self {
            descriptor,
            notifications: 0,
            responses: 0,
            device_errors: BTreeMap::new(),
        }
    }

    pub fn add_device_error(&mut self, code: u8) {
        *self.device_errors.entry(code).or_default() += 1;
    }
}

pub(crate) fn build_command_summaries(stats: BTreeMap<u8, CommandStats>) -> Vec<CommandSummary> {
    stats
        .into_values()
        .map(|stats| CommandSummary {
            identifier: stats.descriptor.identifier,
            name: stats.descriptor.name.to_string(),
            notifications: stats.notifications,
            responses: stats.responses,
            device_errors: stats
                .device_errors
                .into_iter()
                .map(|(code, count)| DeviceErrorCount { code, count })
                .collect(),
        })
        .collect()
}
