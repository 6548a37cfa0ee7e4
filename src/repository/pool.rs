//! A small lazy pool of tiberius clients.
//!
//! The diff engine fans out up to `K` concurrent fetches per database; a
//! single client would serialize them at the wire. The pool dials up to
//! `size` connections on demand, parks idle ones, and gates checkouts with a
//! semaphore so concurrent holders never exceed `size`.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

use tiberius::{Client, Config};
use tokio::net::TcpStream;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// A tiberius client over a tokio TCP stream.
pub(crate) type MsSqlClient = Client<Compat<TcpStream>>;

pub(crate) struct ConnectionPool {
    config: Config,
    permits: Semaphore,
    idle: Mutex<Vec<MsSqlClient>>,
}

impl ConnectionPool {
    /// Create a pool and dial one connection eagerly, so connectivity
    /// problems surface at startup rather than mid-comparison.
    pub async fn connect(config: Config, size: usize) -> Result<Self, tiberius::error::Error> {
        let pool = Self {
            config,
            permits: Semaphore::new(size.max(1)),
            idle: Mutex::new(Vec::new()),
        };

        let client = pool.dial().await?;
        pool.park(client);

        Ok(pool)
    }

    /// Check out a client, dialing a fresh connection if no idle one is
    /// parked. Waits when `size` clients are already checked out.
    pub async fn acquire(&self) -> Result<PooledClient<'_>, tiberius::error::Error> {
        // The semaphore lives as long as the pool and is never closed.
        let permit = self.permits.acquire().await.expect("pool semaphore closed");

        let parked = self.idle.lock().ok().and_then(|mut idle| idle.pop());
        let client = match parked {
            Some(client) => client,
            None => self.dial().await?,
        };

        Ok(PooledClient {
            client: Some(client),
            pool: self,
            _permit: permit,
        })
    }

    async fn dial(&self) -> Result<MsSqlClient, tiberius::error::Error> {
        let tcp = TcpStream::connect(self.config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        Client::connect(self.config.clone(), tcp.compat_write()).await
    }

    fn park(&self, client: MsSqlClient) {
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(client);
        }
    }
}

/// A checked-out client. Call [`release`](PooledClient::release) after a
/// completed exchange to return the connection to the pool; a guard that is
/// simply dropped discards its connection instead, because a future
/// cancelled mid-protocol leaves the TDS stream unusable.
pub(crate) struct PooledClient<'a> {
    client: Option<MsSqlClient>,
    pool: &'a ConnectionPool,
    _permit: SemaphorePermit<'a>,
}

impl PooledClient<'_> {
    /// Return the connection to the idle set.
    pub fn release(mut self) {
        if let Some(client) = self.client.take() {
            self.pool.park(client);
        }
    }
}

impl Deref for PooledClient<'_> {
    type Target = MsSqlClient;

    fn deref(&self) -> &Self::Target {
        self.client.as_ref().expect("client taken")
    }
}

impl DerefMut for PooledClient<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.client.as_mut().expect("client taken")
    }
}
