//! Parsing helpers for `swapon -s` output (same layout as `/proc/swaps`).

use std::collections::BTreeSet;

/// Header label that starts the first line of the listing.
const HEADER_LABEL: &str = "Filename";

/// Devices currently active as swap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapSet {
    devices: BTreeSet<String>,
}

impl SwapSet {
    pub fn contains(&self, device: &str) -> bool {
        self.devices.contains(device)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(String::as_str)
    }
}

pub fn parse_swaps(content: &str) -> SwapSet {
    let devices = content
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|first| *first != HEADER_LABEL)
        .map(str::to_string)
        .collect();
    SwapSet { devices }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Filename\t\t\t\tType\t\tSize\tUsed\tPriority\n";

    #[test]
    fn header_only_listing_is_empty() {
        assert!(parse_swaps(HEADER).is_empty());
        assert!(parse_swaps("").is_empty());
    }

    #[test]
    fn collects_device_paths_without_header() {
        let listing = format!(
            "{HEADER}/dev/swap                              partition\t78180316\t0\t-1\n\
             /dev/xvdb1 partition 1048572 0 -2\n"
        );
        let swaps = parse_swaps(&listing);

        assert_eq!(swaps.len(), 2);
        assert!(swaps.contains("/dev/swap"));
        assert!(swaps.contains("/dev/xvdb1"));
        assert!(!swaps.contains("Filename"));
        assert_eq!(swaps.iter().collect::<Vec<_>>(), vec!["/dev/swap", "/dev/xvdb1"]);
    }

    #[test]
    fn other_device_is_not_a_member() {
        let listing = format!("{HEADER}/dev/swap2 partition 78180316 0 -1\n");
        let swaps = parse_swaps(&listing);
        assert!(!swaps.contains("/dev/swap"));
        assert!(swaps.contains("/dev/swap2"));
    }
}
