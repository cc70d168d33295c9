//! Session registry with idle eviction.
//!
//! Maps endpoint identity to one live [`RemoteClient`] plus an idle timer.
//! The map is a [`DashMap`], so structural mutation only locks the shard that
//! holds the identity; unrelated endpoints never wait on each other.
//!
//! # Lifecycle
//!
//! ```text
//! Absent ──acquire──▶ Active ──acquire──▶ Active (timer reset)
//!                       │
//!                       └──idle TTL / destroy──▶ Absent
//! ```
//!
//! Every timer carries the generation it was armed with. When it fires it only
//! removes the entry if the generation still matches, so a timer that lost a
//! race with a refresh or a replacement can never evict a newer session.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use amt_protocol::ConnectionParameters;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{Mutex as TokioMutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{ClientFactory, RemoteClient};
use crate::error::{Error, Result};


/// Idle TTL applied when none is configured.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(5 * 60);

/// Registry tuning.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
	/// Inactivity after which a session is evicted.
	pub idle_ttl: Duration,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			idle_ttl: DEFAULT_IDLE_TTL,
		}
	}
}

impl RegistryConfig {
	pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
		self.idle_ttl = idle_ttl;
		self
	}
}

type SharedClient = Arc<TokioMutex<Box<dyn RemoteClient>>>;

/// Exclusive access to a session's client for the duration of one call.
pub type ClientGuard<'a> = MutexGuard<'a, Box<dyn RemoteClient>>;

struct SessionEntry {
	session_id: u64,
	/// Token of the currently armed idle timer.
	generation: u64,
	params: ConnectionParameters,
	client: SharedClient,
	timer: JoinHandle<()>,
}

struct Inner {
	sessions: DashMap<Arc<str>, SessionEntry>,
	factory: Arc<dyn ClientFactory>,
	config: RegistryConfig,
	next_id: AtomicU64,
}

impl Inner {
	fn next_id(&self) -> u64 {
		self.next_id.fetch_add(1, Ordering::Relaxed) + 1
	}
}

impl Drop for Inner {
	fn drop(&mut self) {
		let runtime = tokio::runtime::Handle::try_current().ok();
		for (key, entry) in std::mem::take(&mut self.sessions) {
			entry.timer.abort();
			match &runtime {
				Some(runtime) => {
					runtime.spawn(close_client(key, entry.client, "dropped"));
				}
				None => warn!(
					target = "amt.session",
					identity = %key,
					"registry dropped outside a runtime; session not closed"
				),
			}
		}
	}
}

/// Concurrency-safe cache of endpoint sessions.
///
/// Cloning is cheap and yields a handle to the same registry. All methods
/// must be called from within a Tokio runtime, since idle timers and
/// background teardown run as spawned tasks.
///
/// Dropping the last handle closes the remaining clients in the background.
/// Use [`SessionRegistry::shutdown`] to wait for teardown to finish.
#[derive(Clone)]
pub struct SessionRegistry {
	inner: Arc<Inner>,
}

impl SessionRegistry {
	pub fn new(factory: Arc<dyn ClientFactory>, config: RegistryConfig) -> Self {
		Self {
			inner: Arc::new(Inner {
				sessions: DashMap::new(),
				factory,
				config,
				next_id: AtomicU64::new(0),
			}),
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.inner.config
	}

	/// Returns the session for `identity`, creating it if needed.
	///
	/// A live session built from equal parameters is reused and its idle
	/// timer restarted. A session built from different parameters is replaced
	/// and the old client closed in the background. Construction failures
	/// propagate and leave nothing published for the identity.
	pub fn acquire(&self, identity: &str, params: &ConnectionParameters) -> Result<SessionHandle> {
		let key: Arc<str> = Arc::from(identity);
		let mut stale = None;

		let result = match self.inner.sessions.entry(key.clone()) {
			Entry::Occupied(mut occupied) if occupied.get().params == *params => {
				let entry = occupied.get_mut();
				entry.timer.abort();
				entry.generation = self.inner.next_id();
				entry.timer = self.spawn_idle_timer(key.clone(), entry.generation);
				debug!(
					target = "amt.session",
					identity,
					session_id = entry.session_id,
					"reusing session"
				);
				Ok(SessionHandle::from_entry(&key, entry))
			}
			Entry::Occupied(mut occupied) => {
				debug!(
					target = "amt.session",
					identity,
					"connection parameters changed; recreating session"
				);
				match self.build_entry(&key, params) {
					Ok(entry) => {
						let handle = SessionHandle::from_entry(&key, &entry);
						stale = Some(std::mem::replace(occupied.get_mut(), entry));
						Ok(handle)
					}
					Err(err) => {
						stale = Some(occupied.remove());
						Err(err)
					}
				}
			}
			Entry::Vacant(vacant) => self.build_entry(&key, params).map(|entry| {
				let handle = SessionHandle::from_entry(&key, &entry);
				vacant.insert(entry);
				handle
			}),
		};

		if let Some(old) = stale {
			old.timer.abort();
			tokio::spawn(close_client(key, old.client, "replaced"));
		}

		result
	}

	/// Removes the session for `identity` and closes its client.
	///
	/// Returns `false` when no session existed. Waits for any call in flight
	/// on the session to finish before closing.
	pub async fn destroy(&self, identity: &str) -> bool {
		let Some((key, entry)) = self.inner.sessions.remove(identity) else {
			return false;
		};
		entry.timer.abort();
		debug!(
			target = "amt.session",
			identity,
			session_id = entry.session_id,
			"destroying session"
		);
		close_client(key, entry.client, "destroyed").await;
		true
	}

	/// Destroys every session.
	pub async fn shutdown(&self) {
		for identity in self.identities() {
			self.destroy(&identity).await;
		}
	}

	pub fn contains(&self, identity: &str) -> bool {
		self.inner.sessions.contains_key(identity)
	}

	pub fn len(&self) -> usize {
		self.inner.sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.sessions.is_empty()
	}

	/// Identities with a live session, sorted.
	pub fn identities(&self) -> Vec<String> {
		let mut identities: Vec<String> = self.inner.sessions.iter().map(|entry| entry.key().to_string()).collect();
		identities.sort();
		identities
	}

	fn build_entry(&self, key: &Arc<str>, params: &ConnectionParameters) -> Result<SessionEntry> {
		validate(key, params)?;
		let client = self.inner.factory.create(key, params)?;
		let session_id = self.inner.next_id();
		let generation = self.inner.next_id();
		debug!(
			target = "amt.session",
			identity = %key,
			session_id,
			address = %params.address,
			tls = params.use_tls,
			"created session"
		);
		Ok(SessionEntry {
			session_id,
			generation,
			params: params.clone(),
			client: Arc::new(TokioMutex::new(client)),
			timer: self.spawn_idle_timer(key.clone(), generation),
		})
	}

	fn spawn_idle_timer(&self, key: Arc<str>, generation: u64) -> JoinHandle<()> {
		let inner = Arc::downgrade(&self.inner);
		let ttl = self.inner.config.idle_ttl;
		tokio::spawn(async move {
			tokio::time::sleep(ttl).await;
			let Some(inner) = inner.upgrade() else {
				return;
			};
			let evicted = inner
				.sessions
				.remove_if(key.as_ref(), |_, entry| entry.generation == generation);
			drop(inner);
			if let Some((key, entry)) = evicted {
				debug!(
					target = "amt.session",
					identity = %key,
					session_id = entry.session_id,
					ttl_ms = ttl.as_millis() as u64,
					"idle ttl elapsed; evicting session"
				);
				close_client(key, entry.client, "idle").await;
			}
		})
	}
}

impl fmt::Debug for SessionRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionRegistry")
			.field("sessions", &self.len())
			.field("idle_ttl", &self.inner.config.idle_ttl)
			.finish()
	}
}

/// Short-lived handle to a cached session.
///
/// Holds the client lock only while [`SessionHandle::lock`] is held, so calls
/// against the same identity are serialized and calls against different
/// identities are independent. Drop it once the call completes.
#[derive(Clone)]
pub struct SessionHandle {
	identity: Arc<str>,
	session_id: u64,
	client: SharedClient,
}

impl SessionHandle {
	fn from_entry(identity: &Arc<str>, entry: &SessionEntry) -> Self {
		Self {
			identity: identity.clone(),
			session_id: entry.session_id,
			client: entry.client.clone(),
		}
	}

	pub fn identity(&self) -> &str {
		&self.identity
	}

	/// Id assigned when the session was created; stable across refreshes.
	pub fn session_id(&self) -> u64 {
		self.session_id
	}

	/// Waits for exclusive access to the client.
	pub async fn lock(&self) -> ClientGuard<'_> {
		self.client.lock().await
	}

	/// Whether both handles point at the same underlying client.
	pub fn same_session(&self, other: &SessionHandle) -> bool {
		Arc::ptr_eq(&self.client, &other.client)
	}
}

impl fmt::Debug for SessionHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionHandle")
			.field("identity", &self.identity)
			.field("session_id", &self.session_id)
			.finish()
	}
}

fn validate(identity: &str, params: &ConnectionParameters) -> Result<()> {
	let reason = if params.address.trim().is_empty() {
		"address is empty"
	} else if params.username.is_empty() {
		"username is empty"
	} else {
		return Ok(());
	};
	Err(Error::InvalidParameters {
		identity: identity.to_string(),
		reason: reason.to_string(),
	})
}

async fn close_client(identity: Arc<str>, client: SharedClient, reason: &'static str) {
	let mut client = client.lock().await;
	match client.close().await {
		Ok(()) => debug!(target = "amt.session", identity = %identity, reason, "session closed"),
		Err(err) => warn!(
			target = "amt.session",
			identity = %identity,
			reason,
			error = %err,
			"session teardown failed"
		),
	}
}
