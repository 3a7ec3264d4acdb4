use std::convert::Infallible;
use std::io;

use hyper::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use satchel_storage::ObjectStore;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::Gateway;

/// A running gateway server.
pub struct Server {
    /// The endpoint URL where the gateway is listening.
    pub endpoint: String,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl Server {
    /// Bind `address` and serve `gateway` until [stop](Server::stop).
    ///
    /// Binding port 0 lets the OS pick; the bound address is reflected in
    /// [endpoint](Server::endpoint).
    pub async fn start<S>(gateway: Gateway<S>, address: impl ToSocketAddrs) -> io::Result<Self>
    where
        S: ObjectStore + Clone + 'static,
    {
        let listener = TcpListener::bind(address).await?;
        let addr = listener.local_addr()?;
        let endpoint = format!("http://{}", addr);

        let service = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .service(tower::service_fn(move |request: Request<Incoming>| {
                let gateway = gateway.clone();
                async move { Ok::<_, Infallible>(gateway.handle(request).await) }
            }));

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        if let Ok((stream, _)) = result {
                            let connection = TowerToHyperService::new(service.clone());
                            tokio::spawn(async move {
                                let _ = http1::Builder::new()
                                    .serve_connection(TokioIo::new(stream), connection)
                                    .await;
                            });
                        }
                    }
                }
            }
        });

        Ok(Server {
            endpoint,
            shutdown_tx,
        })
    }

    /// Stop accepting connections.
    ///
    /// Connections already being served run to completion.
    pub fn stop(self) {
        let _ = self.shutdown_tx.send(());
    }
}
