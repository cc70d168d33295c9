//! WS-Management resource classes and read verbs.
//!
//! The class list is closed: every class the explorer can query is declared in
//! the `resource_classes!` table below together with its schema and logical
//! call name.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// CIM schema a resource class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
	/// Intel AMT extensions (`AMT_*`).
	Amt,
	/// DMTF common information model (`CIM_*`).
	Cim,
	/// Intel platform services (`IPS_*`).
	Ips,
}

impl Schema {
	/// Resource URI prefix for classes in this schema.
	pub fn base_uri(self) -> &'static str {
		match self {
			Schema::Amt => "http://intel.com/wbem/wscim/1/amt-schema/1/",
			Schema::Cim => "http://schemas.dmtf.org/wbem/wscim/1/cim-schema/2/",
			Schema::Ips => "http://intel.com/wbem/wscim/1/ips-schema/1/",
		}
	}
}

/// Generates [`ResourceClass`] with its name tables.
///
/// Each row: `Variant => Schema, "WireClassName", "LogicalCallName"`.
macro_rules! resource_classes {
	(
		$( $id:ident => $schema:ident, $class:literal, $call:literal ),+ $(,)?
	) => {
		/// A queryable WS-Man resource class.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
		pub enum ResourceClass { $($id),+ }

		impl ResourceClass {
			/// Every class, in declaration order.
			pub const ALL: &'static [ResourceClass] = &[ $(ResourceClass::$id),+ ];

			/// Wire class name, e.g. `AMT_GeneralSettings`.
			pub fn class_name(self) -> &'static str {
				match self {
					$( ResourceClass::$id => $class, )+
				}
			}

			/// Logical call name used by convention dispatch, e.g. `AMTGeneralSettings`.
			pub fn call_name(self) -> &'static str {
				match self {
					$( ResourceClass::$id => $call, )+
				}
			}

			pub fn schema(self) -> Schema {
				match self {
					$( ResourceClass::$id => Schema::$schema, )+
				}
			}
		}
	};
}

resource_classes! {
	Amt8021xCredentialContext => Amt, "AMT_8021xCredentialContext", "AMT8021xCredentialContext",
	Amt8021xProfile => Amt, "AMT_8021XProfile", "AMT8021XProfile",
	AmtAlarmClockService => Amt, "AMT_AlarmClockService", "AMTAlarmClockService",
	AmtAuditLog => Amt, "AMT_AuditLog", "AMTAuditLog",
	AmtAuthorizationService => Amt, "AMT_AuthorizationService", "AMTAuthorizationService",
	AmtBootCapabilities => Amt, "AMT_BootCapabilities", "AMTBootCapabilities",
	AmtBootSettingData => Amt, "AMT_BootSettingData", "AMTBootSettingData",
	AmtEnvironmentDetectionSettingData => Amt, "AMT_EnvironmentDetectionSettingData", "AMTEnvironmentDetectionSettingData",
	AmtEthernetPortSettings => Amt, "AMT_EthernetPortSettings", "AMTEthernetPortSettings",
	AmtGeneralSettings => Amt, "AMT_GeneralSettings", "AMTGeneralSettings",
	AmtKerberosSettingData => Amt, "AMT_KerberosSettingData", "AMTKerberosSettingData",
	AmtManagementPresenceRemoteSap => Amt, "AMT_ManagementPresenceRemoteSAP", "AMTManagementPresenceRemoteSAP",
	AmtMessageLog => Amt, "AMT_MessageLog", "AMTMessageLog",
	AmtMpsUsernamePassword => Amt, "AMT_MPSUsernamePassword", "AMTMPSUsernamePassword",
	AmtPublicKeyCertificate => Amt, "AMT_PublicKeyCertificate", "AMTPublicKeyCertificate",
	AmtPublicKeyManagementService => Amt, "AMT_PublicKeyManagementService", "AMTPublicKeyManagementService",
	AmtPublicPrivateKeyPair => Amt, "AMT_PublicPrivateKeyPair", "AMTPublicPrivateKeyPair",
	AmtRedirectionService => Amt, "AMT_RedirectionService", "AMTRedirectionService",
	AmtRemoteAccessPolicyAppliesToMps => Amt, "AMT_RemoteAccessPolicyAppliesToMPS", "AMTRemoteAccessPolicyAppliesToMPS",
	AmtRemoteAccessPolicyRule => Amt, "AMT_RemoteAccessPolicyRule", "AMTRemoteAccessPolicyRule",
	AmtRemoteAccessService => Amt, "AMT_RemoteAccessService", "AMTRemoteAccessService",
	AmtSetupAndConfigurationService => Amt, "AMT_SetupAndConfigurationService", "AMTSetupAndConfigurationService",
	AmtTimeSynchronizationService => Amt, "AMT_TimeSynchronizationService", "AMTTimeSynchronizationService",
	AmtTlsCredentialContext => Amt, "AMT_TLSCredentialContext", "AMTTLSCredentialContext",
	AmtTlsProtocolEndpointCollection => Amt, "AMT_TLSProtocolEndpointCollection", "AMTTLSProtocolEndpointCollection",
	AmtTlsSettingData => Amt, "AMT_TLSSettingData", "AMTTLSSettingData",
	AmtUserInitiatedConnectionService => Amt, "AMT_UserInitiatedConnectionService", "AMTUserInitiatedConnectionService",
	AmtWiFiPortConfigurationService => Amt, "AMT_WiFiPortConfigurationService", "AMTWiFiPortConfigurationService",
	CimBiosElement => Cim, "CIM_BIOSElement", "CIMBIOSElement",
	CimBootConfigSetting => Cim, "CIM_BootConfigSetting", "CIMBootConfigSetting",
	CimBootService => Cim, "CIM_BootService", "CIMBootService",
	CimBootSourceSetting => Cim, "CIM_BootSourceSetting", "CIMBootSourceSetting",
	CimCard => Cim, "CIM_Card", "CIMCard",
	CimChassis => Cim, "CIM_Chassis", "CIMChassis",
	CimChip => Cim, "CIM_Chip", "CIMChip",
	CimComputerSystemPackage => Cim, "CIM_ComputerSystemPackage", "CIMComputerSystemPackage",
	CimConcreteDependency => Cim, "CIM_ConcreteDependency", "CIMConcreteDependency",
	CimCredentialContext => Cim, "CIM_CredentialContext", "CIMCredentialContext",
	CimIeee8021xSettings => Cim, "CIM_IEEE8021xSettings", "CIMIEEE8021xSettings",
	CimKvmRedirectionSap => Cim, "CIM_KVMRedirectionSAP", "CIMKVMRedirectionSAP",
	CimMediaAccessDevice => Cim, "CIM_MediaAccessDevice", "CIMMediaAccessDevice",
	CimPhysicalMemory => Cim, "CIM_PhysicalMemory", "CIMPhysicalMemory",
	CimPhysicalPackage => Cim, "CIM_PhysicalPackage", "CIMPhysicalPackage",
	CimPowerManagementService => Cim, "CIM_PowerManagementService", "CIMPowerManagementService",
	CimProcessor => Cim, "CIM_Processor", "CIMProcessor",
	CimServiceAvailableToElement => Cim, "CIM_ServiceAvailableToElement", "CIMServiceAvailableToElement",
	CimSoftwareIdentity => Cim, "CIM_SoftwareIdentity", "CIMSoftwareIdentity",
	CimSystemPackaging => Cim, "CIM_SystemPackaging", "CIMSystemPackaging",
	CimWiFiEndpointSettings => Cim, "CIM_WiFiEndpointSettings", "CIMWiFiEndpointSettings",
	CimWiFiPort => Cim, "CIM_WiFiPort", "CIMWiFiPort",
	IpsAlarmClockOccurrence => Ips, "IPS_AlarmClockOccurrence", "IPSAlarmClockOccurrence",
	IpsHostBasedSetupService => Ips, "IPS_HostBasedSetupService", "IPSHostBasedSetupService",
	IpsHttpProxyAccessPoint => Ips, "IPS_HTTPProxyAccessPoint", "IPSHTTPProxyAccessPoint",
	IpsHttpProxyService => Ips, "IPS_HTTPProxyService", "IPSHTTPProxyService",
	IpsIeee8021xCredentialContext => Ips, "IPS_8021xCredentialContext", "IPS8021xCredentialContext",
	IpsIeee8021xSettings => Ips, "IPS_IEEE8021xSettings", "IPSIEEE8021xSettings",
	IpsKvmRedirectionSettingData => Ips, "IPS_KVMRedirectionSettingData", "IPSKVMRedirectionSettingData",
	IpsOptInService => Ips, "IPS_OptInService", "IPSOptInService",
	IpsPowerManagementService => Ips, "IPS_PowerManagementService", "IPSPowerManagementService",
	IpsScreenSettingData => Ips, "IPS_ScreenSettingData", "IPSScreenSettingData",
}

impl ResourceClass {
	/// Full WS-Man resource URI, e.g.
	/// `http://intel.com/wbem/wscim/1/amt-schema/1/AMT_GeneralSettings`.
	pub fn resource_uri(self) -> String {
		format!("{}{}", self.schema().base_uri(), self.class_name())
	}

	/// Looks up a class by wire name, ignoring ASCII case.
	pub fn from_class_name(name: &str) -> Option<Self> {
		Self::ALL.iter().copied().find(|class| class.class_name().eq_ignore_ascii_case(name))
	}

	/// Looks up a class by logical call name (exact match).
	pub fn from_call_name(name: &str) -> Option<Self> {
		Self::ALL.iter().copied().find(|class| class.call_name() == name)
	}
}

impl fmt::Display for ResourceClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.class_name())
	}
}

/// Read verb applied to a resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
	/// Fetch the (singleton or selected) instance.
	Get,
	/// Open an enumeration context.
	Enumerate,
	/// Pull items from an enumeration context (parameter: context id).
	Pull,
	/// Read event records from the audit log (parameter: start index).
	ReadRecords,
	/// Read event records from the message log (parameter: record identifier).
	GetRecords,
	/// Position the message log cursor on its first record.
	PositionToFirstRecord,
	/// List user ACL entries (parameter: start index).
	EnumerateUserAclEntries,
	/// Fetch the admin ACL entry.
	GetAdminAclEntry,
}

impl Method {
	pub const ALL: &'static [Method] = &[
		Method::Get,
		Method::Enumerate,
		Method::Pull,
		Method::ReadRecords,
		Method::GetRecords,
		Method::PositionToFirstRecord,
		Method::EnumerateUserAclEntries,
		Method::GetAdminAclEntry,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Method::Get => "Get",
			Method::Enumerate => "Enumerate",
			Method::Pull => "Pull",
			Method::ReadRecords => "ReadRecords",
			Method::GetRecords => "GetRecords",
			Method::PositionToFirstRecord => "PositionToFirstRecord",
			Method::EnumerateUserAclEntries => "EnumerateUserAclEntries",
			Method::GetAdminAclEntry => "GetAdminAclEntry",
		}
	}

	/// Whether the verb consumes the optional string parameter.
	pub fn takes_parameter(self) -> bool {
		matches!(
			self,
			Method::Get | Method::Pull | Method::ReadRecords | Method::GetRecords | Method::EnumerateUserAclEntries
		)
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unrecognized method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
	type Err = UnknownMethod;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Method::ALL
			.iter()
			.copied()
			.find(|method| method.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| UnknownMethod(s.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn catalog_has_sixty_classes() {
		assert_eq!(ResourceClass::ALL.len(), 60);
	}

	#[test]
	fn names_are_unique() {
		let classes: HashSet<_> = ResourceClass::ALL.iter().map(|c| c.class_name().to_ascii_lowercase()).collect();
		let calls: HashSet<_> = ResourceClass::ALL.iter().map(|c| c.call_name()).collect();
		assert_eq!(classes.len(), ResourceClass::ALL.len());
		assert_eq!(calls.len(), ResourceClass::ALL.len());
	}

	#[test]
	fn call_name_is_class_name_without_separator() {
		for class in ResourceClass::ALL {
			assert_eq!(class.call_name(), class.class_name().replace('_', ""), "{class:?}");
		}
	}

	#[test]
	fn class_name_prefix_matches_schema() {
		for class in ResourceClass::ALL {
			let prefix = match class.schema() {
				Schema::Amt => "AMT_",
				Schema::Cim => "CIM_",
				Schema::Ips => "IPS_",
			};
			assert!(class.class_name().starts_with(prefix), "{class:?}");
		}
	}

	#[test]
	fn lookup_by_class_name_ignores_case() {
		assert_eq!(ResourceClass::from_class_name("amt_generalsettings"), Some(ResourceClass::AmtGeneralSettings));
		assert_eq!(ResourceClass::from_class_name("CIM_BIOSElement"), Some(ResourceClass::CimBiosElement));
		assert_eq!(ResourceClass::from_class_name("AMT_Nope"), None);
		assert_eq!(ResourceClass::from_class_name(""), None);
	}

	#[test]
	fn lookup_by_call_name_is_exact() {
		assert_eq!(ResourceClass::from_call_name("AMTGeneralSettings"), Some(ResourceClass::AmtGeneralSettings));
		assert_eq!(ResourceClass::from_call_name("amtgeneralsettings"), None);
	}

	#[test]
	fn resource_uri_joins_schema_and_class() {
		assert_eq!(
			ResourceClass::CimChassis.resource_uri(),
			"http://schemas.dmtf.org/wbem/wscim/1/cim-schema/2/CIM_Chassis"
		);
	}

	#[test]
	fn method_parses_case_insensitively() {
		assert_eq!("get".parse::<Method>(), Ok(Method::Get));
		assert_eq!("ReadRecords".parse::<Method>(), Ok(Method::ReadRecords));
		assert_eq!("Put".parse::<Method>(), Err(UnknownMethod("Put".to_string())));
	}
}
