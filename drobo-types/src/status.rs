//! Device status structures
//!
//! The status port pushes one XML document per connection. [`StatusRecord`]
//! is populated from it in a single pass over named elements; a missing or
//! unparseable element is an error rather than a default.

use std::fmt;

use crate::document::XmlElement;
use crate::error::{Error, Result};

bitflags::bitflags! {
    /// Flag bits layered on top of the base device status code
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u32 {
        /// Protected capacity is exhausted
        const FULL = 0x0001_0000;
    }
}

/// Base device state (status code with flag bits cleared)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Ok,
    Yellow,
    Red,
    BadDrive,
    DriveRemoved,
    DataProtectionInProgress,
    Unknown(u32),
}

impl From<u32> for DeviceState {
    fn from(code: u32) -> Self {
        match code {
            0x8000 => Self::Ok,
            0x8004 => Self::Yellow,
            0x8006 => Self::Red,
            0x8010 => Self::BadDrive,
            0x8046 => Self::DriveRemoved,
            0x8240 => Self::DataProtectionInProgress,
            other => Self::Unknown(other),
        }
    }
}

/// Raw overall status code as reported in `mStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceStatus(pub u32);

impl DeviceStatus {
    /// Raw status code
    pub fn code(self) -> u32 {
        self.0
    }

    /// Flag bits set in the code
    pub fn flags(self) -> StatusFlags {
        StatusFlags::from_bits_truncate(self.0)
    }

    /// Check if the capacity-full bit is set
    pub fn is_full(self) -> bool {
        self.flags().contains(StatusFlags::FULL)
    }

    /// State decoded from the code with flag bits cleared
    pub fn state(self) -> DeviceState {
        DeviceState::from(self.0 & !StatusFlags::all().bits())
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.state())?;
        if self.is_full() {
            write!(f, " (full)")?;
        }
        Ok(())
    }
}

/// Per-slot disk status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskStatus {
    FullRed,
    FullYellow,
    Green,
    DataProtection,
    Empty,
    Removed,
    Failure,
    Unknown(u32),
}

impl From<u32> for DiskStatus {
    fn from(code: u32) -> Self {
        match code {
            0x01 => Self::FullRed,
            0x02 => Self::FullYellow,
            0x03 => Self::Green,
            0x04 => Self::DataProtection,
            0x80 => Self::Empty,
            0x81 => Self::Removed,
            0x86 => Self::Failure,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskType {
    Hdd,
    MsataSsd,
    Unknown(u32),
}

impl From<u32> for DiskType {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Hdd,
            4 => Self::MsataSsd,
            other => Self::Unknown(other),
        }
    }
}

/// One physical disk bay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    /// Raw disk status code
    pub status_code: u32,

    pub error_count: u32,

    /// Raw disk type code
    pub disk_type_code: u32,

    pub make: String,

    pub firmware_revision: String,

    pub serial: String,

    /// Physical capacity in bytes
    pub physical_capacity: u64,
}

impl SlotRecord {
    /// Typed disk status
    pub fn status(&self) -> DiskStatus {
        DiskStatus::from(self.status_code)
    }

    /// Typed disk type
    pub fn disk_type(&self) -> DiskType {
        DiskType::from(self.disk_type_code)
    }

    /// `true` when no disk is seated in the bay
    pub fn is_empty(&self) -> bool {
        self.status() == DiskStatus::Empty
    }

    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            status_code: el.require_parsed("mStatus")?,
            error_count: el.require_parsed("mErrorCount")?,
            disk_type_code: el.require_parsed("mDiskType")?,
            make: el.require_text("mMake")?.to_string(),
            firmware_revision: el.require_text("mDiskFwRev")?.to_string(),
            serial: el.require_text("mSerial")?.to_string(),
            physical_capacity: el.require_parsed("mPhysicalCapacity")?,
        })
    }
}

/// Device status pushed on the status port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub status: DeviceStatus,

    /// Enclosure identifier, required for the command channel handshake
    pub esa_id: String,

    pub disk_pack_status: String,

    pub model: String,

    /// User-assigned device name
    pub name: String,

    pub firmware_version: String,

    /// Total protected capacity in bytes
    pub total_capacity_protected: u64,

    /// Used protected capacity in bytes
    pub used_capacity_protected: u64,

    pub apps_enabled: bool,

    pub slot_count: usize,

    /// Indexed `0..slot_count`
    pub slots: Vec<SlotRecord>,
}

impl StatusRecord {
    /// Build from the root element of a status document
    pub fn from_element(root: &XmlElement) -> Result<Self> {
        let slot_count: usize = root.require_parsed("mSlotCountExp")?;

        let slots_el = root
            .child("mSlotsExp")
            .ok_or_else(|| Error::MissingField("mSlotsExp".into()))?;

        let slots = (0..slot_count)
            .map(|index| {
                let name = format!("n{index}");
                let slot = slots_el
                    .child(&name)
                    .ok_or_else(|| Error::MissingField(format!("mSlotsExp/{name}")))?;
                SlotRecord::from_element(slot)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            status: DeviceStatus(root.require_parsed("mStatus")?),
            esa_id: root.require_text("mESAID")?.to_string(),
            disk_pack_status: root.require_text("mDiskPackStatus")?.to_string(),
            model: root.require_text("mModel")?.to_string(),
            name: root.require_text("mDroboName")?.to_string(),
            firmware_version: root.require_text("mVersion")?.to_string(),
            total_capacity_protected: root.require_parsed("mTotalCapacityProtected")?,
            used_capacity_protected: root.require_parsed("mUsedCapacityProtected")?,
            apps_enabled: root.require_flag("DroboApps/DNASDroboAppsEnabled")?,
            slot_count,
            slots,
        })
    }

    /// Slot by zero-based bay index
    pub fn slot(&self, index: usize) -> Option<&SlotRecord> {
        self.slots.get(index)
    }
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Drobo[{} {}, ESA: {}, FW: {}, status: {}]",
            self.model, self.name, self.esa_id, self.firmware_version, self.status
        )
    }
}
