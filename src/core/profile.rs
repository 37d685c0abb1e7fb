use serde::{Deserialize, Serialize};

use super::error::OrderError;

/// Order-X capability profile.
///
/// Profiles are strictly ordered by capability: everything a Basic document
/// may carry is also allowed in Comfort, and everything in Comfort is allowed
/// in Extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// Minimal order with line items and the most common header data.
    Basic,
    /// Adds parties, references, tax and payment information.
    Comfort,
    /// Full Order-X data set.
    Extended,
}

/// Static description of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileDescriptor {
    pub name: &'static str,
    pub altname: &'static str,
    pub description: &'static str,
    /// Guideline URN written to `GuidelineSpecifiedDocumentContextParameter/ID`.
    pub contextparameter: &'static str,
    /// File name of the XML attachment inside a PDF/A-3 envelope.
    pub attachmentfilename: &'static str,
    /// Value of `fx:ConformanceLevel` in the XMP metadata.
    pub xmpname: &'static str,
    pub xsdfilename: &'static str,
    pub schematronfilename: &'static str,
}

static PROFILES: [ProfileDescriptor; 3] = [
    ProfileDescriptor {
        name: "basic",
        altname: "BASIC",
        description: "The BASIC profile covers the minimum data needed to process an order",
        contextparameter: "urn:order-x.eu:1p0:basic",
        attachmentfilename: "order-x.xml",
        xmpname: "BASIC",
        xsdfilename: "SCRDMCCBDACIOMessageStructure_100pD20B.xsd",
        schematronfilename: "SCRDMCCBDACIOMessageStructure_100pD20B_BASIC.sch",
    },
    ProfileDescriptor {
        name: "comfort",
        altname: "COMFORT",
        description: "The COMFORT profile covers structured orders with references, tax and payment data",
        contextparameter: "urn:order-x.eu:1p0:comfort",
        attachmentfilename: "order-x.xml",
        xmpname: "COMFORT",
        xsdfilename: "SCRDMCCBDACIOMessageStructure_100pD20B.xsd",
        schematronfilename: "SCRDMCCBDACIOMessageStructure_100pD20B_COMFORT.sch",
    },
    ProfileDescriptor {
        name: "extended",
        altname: "EXTENDED",
        description: "The EXTENDED profile covers the complete Order-X data set",
        contextparameter: "urn:order-x.eu:1p0:extended",
        attachmentfilename: "order-x.xml",
        xmpname: "EXTENDED",
        xsdfilename: "SCRDMCCBDACIOMessageStructure_100pD20B.xsd",
        schematronfilename: "SCRDMCCBDACIOMessageStructure_100pD20B_EXTENDED.sch",
    },
];

impl Profile {
    /// All profiles in capability order.
    pub const ALL: [Profile; 3] = [Profile::Basic, Profile::Comfort, Profile::Extended];

    /// Numeric profile id (0 = Basic, 1 = Comfort, 2 = Extended).
    pub fn id(self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::Comfort => 1,
            Self::Extended => 2,
        }
    }

    /// The static descriptor of this profile.
    pub fn descriptor(self) -> &'static ProfileDescriptor {
        &PROFILES[self.id() as usize]
    }

    /// Guideline URN of this profile.
    pub fn urn(self) -> &'static str {
        self.descriptor().contextparameter
    }

    /// Look up a profile by its guideline URN.
    pub fn from_urn(urn: &str) -> Option<Self> {
        let urn = urn.trim();
        Self::ALL.into_iter().find(|p| p.urn() == urn)
    }

    /// Whether this profile may carry the given optional feature.
    pub fn supports(self, feature: Feature) -> bool {
        self >= feature.min_profile()
    }
}

/// Reverse lookup of a profile by numeric id.
pub fn resolve_by_id(id: u8) -> Result<Profile, OrderError> {
    Profile::ALL
        .into_iter()
        .find(|p| p.id() == id)
        .ok_or_else(|| OrderError::unknown_profile_id(id))
}

/// Reverse lookup of a profile descriptor by numeric id.
pub fn resolve_profile_def_by_id(id: u8) -> Result<&'static ProfileDescriptor, OrderError> {
    resolve_by_id(id).map(Profile::descriptor)
}

/// Optional accessor groups that are only available from a certain profile on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    BuyerRequisitioner,
    ShipFrom,
    Invoicee,
    DeliveryTerms,
    QuotationReference,
    ContractReference,
    RequisitionReference,
    AdditionalReferences,
    ProcuringProject,
    PaymentMeans,
    DocumentTax,
    AccountingAccounts,
    ProductCharacteristics,
    ProductClassifications,
    ProductPackaging,
    OriginCountry,
    PositionTax,
    GrossPriceAllowanceCharges,
    BlanketOrderReference,
    PreviousOrderReferences,
    UltimateCustomerOrderReference,
    RequestedDespatch,
    ProductInstances,
    ReferencedProducts,
    LogisticsServiceCharges,
    CatalogueReference,
}

impl Feature {
    /// Lowest profile that carries this feature.
    pub fn min_profile(self) -> Profile {
        match self {
            Self::BuyerRequisitioner
            | Self::ShipFrom
            | Self::Invoicee
            | Self::DeliveryTerms
            | Self::QuotationReference
            | Self::ContractReference
            | Self::RequisitionReference
            | Self::AdditionalReferences
            | Self::ProcuringProject
            | Self::PaymentMeans
            | Self::DocumentTax
            | Self::AccountingAccounts
            | Self::ProductCharacteristics
            | Self::ProductClassifications
            | Self::ProductPackaging
            | Self::OriginCountry
            | Self::PositionTax
            | Self::GrossPriceAllowanceCharges => Profile::Comfort,
            Self::BlanketOrderReference
            | Self::PreviousOrderReferences
            | Self::UltimateCustomerOrderReference
            | Self::RequestedDespatch
            | Self::ProductInstances
            | Self::ReferencedProducts
            | Self::LogisticsServiceCharges
            | Self::CatalogueReference => Profile::Extended,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.descriptor().altname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_descriptors_line_up() {
        for profile in Profile::ALL {
            assert_eq!(resolve_by_id(profile.id()).unwrap(), profile);
            assert_eq!(
                resolve_profile_def_by_id(profile.id()).unwrap(),
                profile.descriptor()
            );
            assert_eq!(Profile::from_urn(profile.urn()), Some(profile));
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!(matches!(resolve_by_id(7), Err(OrderError::UnknownProfile(_))));
    }

    #[test]
    fn profiles_are_ordered_by_capability() {
        assert!(Profile::Basic < Profile::Comfort);
        assert!(Profile::Comfort < Profile::Extended);
        assert!(Profile::Extended.supports(Feature::ProductInstances));
        assert!(!Profile::Comfort.supports(Feature::UltimateCustomerOrderReference));
        assert!(!Profile::Basic.supports(Feature::PaymentMeans));
    }
}
