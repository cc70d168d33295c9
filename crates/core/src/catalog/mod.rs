//! Operation catalog: every `(class, method)` pair the explorer can invoke.
//!
//! The table is declared once with `operation_table!` and materialized into a
//! [`Catalog`] on first use. Two lookups share it:
//!
//! - the logical-call namespace (`AMTGeneralSettings`), which maps each class
//!   to its primary method, and
//! - the class namespace (`AMT_GeneralSettings` + `Get`), used for ad-hoc
//!   exploration.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use amt_protocol::{Method, Reply, ResourceClass};
use amt_runtime::{BoxFut, RemoteClient};
use thiserror::Error;


/// Parameter rejected before any remote call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidParameter(pub String);

/// Binds one method to a client. Returns the pending remote call, or rejects
/// the parameter up front.
pub type Procedure =
	for<'a> fn(&'a mut dyn RemoteClient, ResourceClass, Option<&'a str>) -> Result<BoxFut<'a, Reply>, InvalidParameter>;

/// Record index used by the log readers when no parameter is given.
const FIRST_RECORD: u32 = 1;

fn get<'a>(
	client: &'a mut dyn RemoteClient,
	class: ResourceClass,
	param: Option<&'a str>,
) -> Result<BoxFut<'a, Reply>, InvalidParameter> {
	Ok(client.get(class, param))
}

fn enumerate<'a>(
	client: &'a mut dyn RemoteClient,
	class: ResourceClass,
	_param: Option<&'a str>,
) -> Result<BoxFut<'a, Reply>, InvalidParameter> {
	Ok(client.enumerate(class))
}

fn pull<'a>(
	client: &'a mut dyn RemoteClient,
	class: ResourceClass,
	param: Option<&'a str>,
) -> Result<BoxFut<'a, Reply>, InvalidParameter> {
	let context = param.ok_or_else(|| InvalidParameter("Pull requires an enumeration context".to_string()))?;
	Ok(client.pull(class, context))
}

fn read_records<'a>(
	client: &'a mut dyn RemoteClient,
	class: ResourceClass,
	param: Option<&'a str>,
) -> Result<BoxFut<'a, Reply>, InvalidParameter> {
	let start = record_index(param)?;
	Ok(client.read_records(class, start))
}

fn position_to_first_record<'a>(
	client: &'a mut dyn RemoteClient,
	_class: ResourceClass,
	_param: Option<&'a str>,
) -> Result<BoxFut<'a, Reply>, InvalidParameter> {
	Ok(client.position_to_first_record())
}

fn enumerate_user_acl_entries<'a>(
	client: &'a mut dyn RemoteClient,
	_class: ResourceClass,
	param: Option<&'a str>,
) -> Result<BoxFut<'a, Reply>, InvalidParameter> {
	let start = record_index(param)?;
	Ok(client.enumerate_user_acl_entries(start))
}

fn get_admin_acl_entry<'a>(
	client: &'a mut dyn RemoteClient,
	_class: ResourceClass,
	_param: Option<&'a str>,
) -> Result<BoxFut<'a, Reply>, InvalidParameter> {
	Ok(client.get_admin_acl_entry())
}

fn record_index(param: Option<&str>) -> Result<u32, InvalidParameter> {
	match param.map(str::trim) {
		None | Some("") => Ok(FIRST_RECORD),
		Some(raw) => raw
			.parse()
			.map_err(|_| InvalidParameter(format!("expected a record index, got '{raw}'"))),
	}
}

fn procedure_for(method: Method) -> Procedure {
	match method {
		Method::Get => get,
		Method::Enumerate => enumerate,
		Method::Pull => pull,
		Method::ReadRecords | Method::GetRecords => read_records,
		Method::PositionToFirstRecord => position_to_first_record,
		Method::EnumerateUserAclEntries => enumerate_user_acl_entries,
		Method::GetAdminAclEntry => get_admin_acl_entry,
	}
}

/// One invocable operation.
#[derive(Clone, Copy)]
pub struct OperationDescriptor {
	class: ResourceClass,
	method: Method,
	call_name: Option<&'static str>,
	procedure: Procedure,
}

impl OperationDescriptor {
	pub fn class(&self) -> ResourceClass {
		self.class
	}

	pub fn method(&self) -> Method {
		self.method
	}

	/// Logical call name, set only on the class's primary operation.
	pub fn call_name(&self) -> Option<&'static str> {
		self.call_name
	}

	/// `Class.Method`, e.g. `AMT_GeneralSettings.Get`.
	pub fn name(&self) -> String {
		format!("{}.{}", self.class.class_name(), self.method.as_str())
	}

	pub fn takes_parameter(&self) -> bool {
		self.method.takes_parameter()
	}

	/// Starts the remote call on `client`.
	pub fn invoke<'a>(
		&self,
		client: &'a mut dyn RemoteClient,
		param: Option<&'a str>,
	) -> Result<BoxFut<'a, Reply>, InvalidParameter> {
		(self.procedure)(client, self.class, param)
	}
}

impl fmt::Debug for OperationDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OperationDescriptor")
			.field("class", &self.class)
			.field("method", &self.method)
			.field("call_name", &self.call_name)
			.finish_non_exhaustive()
	}
}

/// Expands rows of `Class => Primary [+ Extra, ...]` into `OPERATION_TABLE`.
///
/// Every class supports `Get`, `Enumerate` and `Pull`; extras are appended in
/// the order written. The primary method backs the class's logical call name.
macro_rules! operation_table {
	(
		$( $class:ident => $primary:ident $( + [ $($extra:ident),+ $(,)? ] )? ),+ $(,)?
	) => {
		const OPERATION_TABLE: &[(ResourceClass, Method, &[Method])] = &[
			$(
				(
					ResourceClass::$class,
					Method::$primary,
					&[Method::Get, Method::Enumerate, Method::Pull $( $(, Method::$extra)+ )?],
				),
			)+
		];
	};
}

operation_table! {
	Amt8021xCredentialContext => Enumerate,
	Amt8021xProfile => Get,
	AmtAlarmClockService => Get,
	AmtAuditLog => ReadRecords + [ReadRecords],
	AmtAuthorizationService => Get + [EnumerateUserAclEntries, GetAdminAclEntry],
	AmtBootCapabilities => Get,
	AmtBootSettingData => Get,
	AmtEnvironmentDetectionSettingData => Get,
	AmtEthernetPortSettings => Enumerate,
	AmtGeneralSettings => Get,
	AmtKerberosSettingData => Get,
	AmtManagementPresenceRemoteSap => Enumerate,
	AmtMessageLog => GetRecords + [GetRecords, PositionToFirstRecord],
	AmtMpsUsernamePassword => Enumerate,
	AmtPublicKeyCertificate => Enumerate,
	AmtPublicKeyManagementService => Get,
	AmtPublicPrivateKeyPair => Enumerate,
	AmtRedirectionService => Get,
	AmtRemoteAccessPolicyAppliesToMps => Enumerate,
	AmtRemoteAccessPolicyRule => Enumerate,
	AmtRemoteAccessService => Get,
	AmtSetupAndConfigurationService => Get,
	AmtTimeSynchronizationService => Get,
	AmtTlsCredentialContext => Enumerate,
	AmtTlsProtocolEndpointCollection => Get,
	AmtTlsSettingData => Enumerate,
	AmtUserInitiatedConnectionService => Get,
	AmtWiFiPortConfigurationService => Get,
	CimBiosElement => Get,
	CimBootConfigSetting => Get,
	CimBootService => Get,
	CimBootSourceSetting => Enumerate,
	CimCard => Get,
	CimChassis => Get,
	CimChip => Enumerate,
	CimComputerSystemPackage => Get,
	CimConcreteDependency => Enumerate,
	CimCredentialContext => Enumerate,
	CimIeee8021xSettings => Enumerate,
	CimKvmRedirectionSap => Get,
	CimMediaAccessDevice => Enumerate,
	CimPhysicalMemory => Enumerate,
	CimPhysicalPackage => Enumerate,
	CimPowerManagementService => Get,
	CimProcessor => Enumerate,
	CimServiceAvailableToElement => Enumerate,
	CimSoftwareIdentity => Enumerate,
	CimSystemPackaging => Enumerate,
	CimWiFiEndpointSettings => Enumerate,
	CimWiFiPort => Enumerate,
	IpsAlarmClockOccurrence => Enumerate,
	IpsHostBasedSetupService => Get,
	IpsHttpProxyAccessPoint => Enumerate,
	IpsHttpProxyService => Get,
	IpsIeee8021xCredentialContext => Enumerate,
	IpsIeee8021xSettings => Enumerate,
	IpsKvmRedirectionSettingData => Get,
	IpsOptInService => Get,
	IpsPowerManagementService => Get,
	IpsScreenSettingData => Get,
}

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog::from_table(OPERATION_TABLE));

/// Immutable operation table with both lookup namespaces.
pub struct Catalog {
	operations: Vec<OperationDescriptor>,
	by_pair: HashMap<(ResourceClass, Method), usize>,
	by_call: HashMap<&'static str, usize>,
	calls: Vec<&'static str>,
}

impl Catalog {
	/// The process-wide catalog.
	pub fn builtin() -> &'static Catalog {
		&BUILTIN
	}

	fn from_table(table: &[(ResourceClass, Method, &[Method])]) -> Self {
		let mut catalog = Catalog {
			operations: Vec::new(),
			by_pair: HashMap::new(),
			by_call: HashMap::new(),
			calls: Vec::with_capacity(table.len()),
		};

		for &(class, primary, methods) in table {
			for &method in methods {
				if catalog.by_pair.contains_key(&(class, method)) {
					continue;
				}
				let call_name = (method == primary).then(|| class.call_name());
				let index = catalog.operations.len();
				catalog.operations.push(OperationDescriptor {
					class,
					method,
					call_name,
					procedure: procedure_for(method),
				});
				catalog.by_pair.insert((class, method), index);
				if let Some(call) = call_name {
					catalog.by_call.insert(call, index);
					catalog.calls.push(call);
				}
			}
		}

		catalog
	}

	/// Operations for `class_name` (wire name, any case). An empty name
	/// returns the whole catalog; an unknown name returns nothing.
	pub fn describe(&self, class_name: &str) -> Vec<&OperationDescriptor> {
		let class_name = class_name.trim();
		if class_name.is_empty() {
			return self.operations.iter().collect();
		}
		match ResourceClass::from_class_name(class_name) {
			Some(class) => self.operations.iter().filter(|op| op.class == class).collect(),
			None => Vec::new(),
		}
	}

	/// Looks up an operation by wire class name and method name.
	pub fn resolve(&self, class_name: &str, method_name: &str) -> Option<&OperationDescriptor> {
		let class = ResourceClass::from_class_name(class_name.trim())?;
		let method = method_name.trim().parse::<Method>().ok()?;
		self.get(class, method)
	}

	/// Looks up an operation by logical call name (exact match).
	pub fn resolve_call(&self, call_name: &str) -> Option<&OperationDescriptor> {
		self.by_call.get(call_name).map(|&index| &self.operations[index])
	}

	pub fn get(&self, class: ResourceClass, method: Method) -> Option<&OperationDescriptor> {
		self.by_pair.get(&(class, method)).map(|&index| &self.operations[index])
	}

	/// Logical call names in table order.
	pub fn call_names(&self) -> &[&'static str] {
		&self.calls
	}

	/// Wire class names in table order.
	pub fn class_names(&self) -> Vec<&'static str> {
		let mut names: Vec<&'static str> = Vec::new();
		for op in &self.operations {
			let name = op.class.class_name();
			if names.last() != Some(&name) {
				names.push(name);
			}
		}
		names
	}

	pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
		self.operations.iter()
	}

	pub fn len(&self) -> usize {
		self.operations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.operations.is_empty()
	}
}

impl fmt::Debug for Catalog {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Catalog")
			.field("operations", &self.operations.len())
			.field("calls", &self.calls.len())
			.finish()
	}
}
