//! LSID factories for lineage tests
//!
//! Identifiers follow the namespaces the default classifier recognizes, so
//! `PrefixClassifier::default()` classifies them correctly.

use exp_core::{Identifiable, NodeId, NodeKind};

pub const MATERIAL_PREFIX: &str = "urn:lsid:labkey.com:Sample.Folder-1.Samples:";
pub const DATA_PREFIX: &str = "urn:lsid:labkey.com:Data.Folder-1:";
pub const RUN_PREFIX: &str = "urn:lsid:labkey.com:Run.Folder-1:";
pub const PROTOCOL_APPLICATION_PREFIX: &str = "urn:lsid:labkey.com:ProtocolApplication.Folder-1:";

fn lsid(prefix: &str, name: &str) -> NodeId {
    NodeId::new(format!("{}{}", prefix, name)).expect("fixture LSIDs are never blank")
}

/// LSID of a sample
pub fn material(name: &str) -> NodeId {
    lsid(MATERIAL_PREFIX, name)
}

/// LSID of a data object
pub fn data(name: &str) -> NodeId {
    lsid(DATA_PREFIX, name)
}

/// LSID of a run
pub fn run(name: &str) -> NodeId {
    lsid(RUN_PREFIX, name)
}

/// LSID of a protocol application
pub fn protocol_application(name: &str) -> NodeId {
    lsid(PROTOCOL_APPLICATION_PREFIX, name)
}

/// Seed descriptor for a sample
pub fn material_seed(name: &str, row_id: i64) -> Identifiable {
    Identifiable::new(material(name), NodeKind::Material)
        .with_row_id(row_id)
        .with_name(name)
}

/// Seed descriptor for a data object
pub fn data_seed(name: &str, row_id: i64) -> Identifiable {
    Identifiable::new(data(name), NodeKind::Data)
        .with_row_id(row_id)
        .with_name(name)
}

/// Run descriptor, as accepted by `EdgeStore::sync_run`
pub fn run_entity(name: &str, row_id: i64) -> Identifiable {
    Identifiable::new(run(name), NodeKind::Run)
        .with_row_id(row_id)
        .with_name(name)
}
