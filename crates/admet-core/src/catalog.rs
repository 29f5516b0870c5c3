//! Static ADMET property catalog.
//!
//! Every property the inference backend can report, in a fixed serving
//! order: physicochemical descriptors first, then absorption,
//! distribution, excretion, metabolism, and toxicity endpoints.
//!
//! The catalog is immutable for the life of the process. [`verify_catalog`]
//! rejects duplicate canonical ids at startup; a failure there is fatal.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{AdmetError, Result};

/// Prediction task kind for a property.
///
/// Informational only; classification outcomes are reported as
/// probabilities and do not change serving logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Regression,
    Classification,
}

/// One entry in the property catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PropertyDescriptor {
    /// Canonical id — the key the inference backend reports under.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub task: TaskKind,
}

const fn reg(id: &'static str, label: &'static str) -> PropertyDescriptor {
    PropertyDescriptor {
        id,
        label,
        task: TaskKind::Regression,
    }
}

const fn class(id: &'static str, label: &'static str) -> PropertyDescriptor {
    PropertyDescriptor {
        id,
        label,
        task: TaskKind::Classification,
    }
}

/// Full property catalog, in serving order.
pub const CATALOG: &[PropertyDescriptor] = &[
    // Physicochemical
    reg("molecular_weight", "Molecular Weight"),
    reg("logP", "LogP"),
    reg("hydrogen_bond_acceptors", "Hydrogen Bond Acceptors"),
    reg("hydrogen_bond_donors", "Hydrogen Bond Donors"),
    reg("Lipinski", "Lipinski Rule of 5"),
    reg("QED", "Quantitative Estimate of Druglikeness"),
    reg("stereo_centers", "Stereo Centers"),
    reg("tpsa", "Topological Polar Surface Area"),
    // Absorption
    class("HIA_Hou", "Human Intestinal Absorption"),
    class("Bioavailability_Ma", "Oral Bioavailability"),
    reg("Solubility_AqSolDB", "Aqueous Solubility"),
    reg("Lipophilicity_AstraZeneca", "Lipophilicity"),
    reg("HydrationFreeEnergy_FreeSolv", "Hydration Free Energy"),
    reg("Caco2_Wang", "Caco2 Permeability"),
    class("PAMPA_NCATS", "PAMPA Permeability"),
    class("Pgp_Broccatelli", "P-glycoprotein Inhibition"),
    // Distribution
    class("BBB_Martins", "Blood-Brain Barrier Penetration"),
    reg("PPBR_AZ", "Plasma Protein Binding Rate"),
    reg("VDss_Lombardo", "Volume of Distribution Steady State"),
    // Excretion
    reg("Half_Life_Obach", "Half-Life"),
    reg("Clearance_Hepatocyte_AZ", "Drug Clearance Hepatocyte"),
    reg("Clearance_Microsome_AZ", "Drug Clearance Microsome"),
    // Metabolism
    class("CYP1A2_Veith", "CYP1A2 Inhibition"),
    class("CYP2C19_Veith", "CYP2C19 Inhibition"),
    class("CYP2C9_Veith", "CYP2C9 Inhibition"),
    class("CYP2D6_Veith", "CYP2D6 Inhibition"),
    class("CYP3A4_Veith", "CYP3A4 Inhibition"),
    class("CYP2C9_Substrate_CarbonMangels", "CYP2C9 Substrate"),
    class("CYP2D6_Substrate_CarbonMangels", "CYP2D6 Substrate"),
    class("CYP3A4_Substrate_CarbonMangels", "CYP3A4 Substrate"),
    // Toxicity
    class("hERG", "hERG Blocking"),
    class("ClinTox", "Clinical Toxicity"),
    class("AMES", "AMES Mutagenicity"),
    class("DILI", "Drug Induced Liver Injury"),
    class("Carcinogens_Lagunin", "Carcinogenicity"),
    reg("LD50_Zhu", "Acute Toxicity LD50"),
    class("Skin_Reaction", "Skin Reaction"),
    class("NR-AR", "Androgen Receptor"),
    class("NR-AR-LBD", "Androgen Receptor LBD"),
    class("NR-AhR", "Aryl Hydrocarbon Receptor"),
    class("NR-Aromatase", "Aromatase"),
    class("NR-ER", "Estrogen Receptor"),
    class("NR-ER-LBD", "Estrogen Receptor LBD"),
    class("NR-PPAR-gamma", "PPAR-gamma"),
    class("SR-ARE", "ARE"),
    class("SR-ATAD5", "ATAD5"),
    class("SR-HSE", "HSE"),
    class("SR-MMP", "Mitochondrial Membrane Potential"),
    class("SR-p53", "p53"),
];

/// Canonical ids in catalog order.
pub fn catalog_ids() -> Vec<&'static str> {
    CATALOG.iter().map(|p| p.id).collect()
}

/// Reject duplicate canonical ids.
///
/// Called once at startup via the resolver build; a failure means the
/// process must not begin serving.
pub fn verify_catalog(catalog: &[PropertyDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    for prop in catalog {
        if !seen.insert(prop.id) {
            return Err(AdmetError::DuplicateProperty {
                id: prop.id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_no_duplicate_ids() {
        verify_catalog(CATALOG).expect("catalog ids must be unique");
    }

    #[test]
    fn test_catalog_ids_preserve_order() {
        let ids = catalog_ids();
        assert_eq!(ids.len(), CATALOG.len());
        assert_eq!(ids[0], "molecular_weight");
        assert_eq!(ids[ids.len() - 1], "SR-p53");
    }

    #[test]
    fn test_verify_catalog_rejects_duplicates() {
        let dup = [reg("logP", "LogP"), reg("logP", "LogP again")];
        let err = verify_catalog(&dup).unwrap_err();
        assert!(err.to_string().contains("logP"));
    }

    #[test]
    fn test_task_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TaskKind::Classification).unwrap();
        assert_eq!(json, "\"classification\"");
    }
}
