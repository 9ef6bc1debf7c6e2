//! Parsing helpers for `/proc/mounts` (and similar `device mountpoint [fstype ...]` tables).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: String,
    pub fs_type: Option<String>,
}

/// Snapshot of the mount table in file order.
///
/// Lookups return the first matching entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountTable {
    entries: Vec<MountEntry>,
}

impl MountTable {
    pub fn new(entries: Vec<MountEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MountEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_device(&self, device: &str) -> Option<&MountEntry> {
        self.entries.iter().find(|e| e.device == device)
    }

    pub fn find_by_mount_point(&self, mount_point: &str) -> Option<&MountEntry> {
        self.entries.iter().find(|e| e.mount_point == mount_point)
    }

    pub fn find_by_device_or_mount_point(&self, id: &str) -> Option<&MountEntry> {
        self.entries
            .iter()
            .find(|e| e.device == id || e.mount_point == id)
    }
}

/// Parse a mount table. Lines with fewer than two fields are skipped.
pub fn parse_mounts(content: &str) -> MountTable {
    let entries = content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            Some(MountEntry {
                device: unescape_mount_path(device),
                mount_point: unescape_mount_path(mount_point),
                fs_type: fields.next().map(str::to_string),
            })
        })
        .collect();
    MountTable::new(entries)
}

/// Decode the octal escapes the kernel uses for whitespace and backslashes.
pub fn unescape_mount_path(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    raw.replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}
