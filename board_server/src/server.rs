use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use actix_web::{
    dev::ServerHandle,
    http::header,
    web::{self, Data},
    App, HttpRequest, HttpResponse, HttpServer,
};
use tracing::{info, instrument, warn};
use url::Url;

use crate::completion::CompletionGroup;
use crate::env::Settings;
use crate::error::{HubError, ProtocolViolation, ServerError};
use crate::hub::HubHandle;
use crate::protocol::{GameResponse, GameSession};
use crate::subscriber::Subscriber;

pub struct AppState {
    pub hub: HubHandle,
    pub game_id: String,
    pub write_timeout: Duration,
}

impl AppState {
    fn ensure_game(&self, game_id: &str) -> Result<(), ServerError> {
        if game_id == self.game_id {
            Ok(())
        } else {
            Err(ServerError::game_not_found(game_id))
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/games/{id}").route(web::get().to(game_info)))
        .service(web::resource("/games/{id}/events").route(web::get().to(game_events)))
        .service(web::resource("/socket/{id}").route(web::get().to(game_events)));
}

async fn game_info(
    path: web::Path<String>,
    state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let game_id = path.into_inner();
    state.ensure_game(&game_id)?;

    let info = state.hub.game_info().await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .json(GameResponse::new(&info.session, info.last_frame.as_deref())))
}

async fn game_events(
    req: HttpRequest,
    body: web::Payload,
    path: web::Path<String>,
    state: Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let game_id = path.into_inner();
    state.ensure_game(&game_id)?;

    let (response, session, stream) =
        actix_ws::handle(&req, body).map_err(|e| ServerError::handshake(e.to_string()))?;

    let handle = state.hub.register_subscriber().await?;
    let subscriber = Subscriber::new(handle, session, state.write_timeout);
    info!(
        subscriber_id = %subscriber.id(),
        peer = ?req.peer_addr(),
        "viewer connected"
    );
    subscriber.spawn(stream);

    Ok(response)
}

/// A running board: the hub actor plus the HTTP listener in front of it.
pub struct BoardServer {
    local_addr: SocketAddr,
    game_id: String,
    hub: HubHandle,
    server: ServerHandle,
    completion: CompletionGroup,
    stopping: AtomicBool,
}

impl BoardServer {
    /// Must be called from inside the actix system.
    #[instrument(skip_all, fields(game_id = %session.id))]
    pub fn start(settings: &Settings, session: GameSession) -> Result<Self, ServerError> {
        let (completion, dispatch_done, listener_done) = CompletionGroup::pair();
        let game_id = session.id.clone();

        let listener = TcpListener::bind((
            settings.server.bind_address.as_str(),
            settings.server.port,
        ))?;
        let local_addr = listener.local_addr()?;

        let hub = HubHandle::start(session, &settings.hub, dispatch_done);
        let state = Data::new(AppState {
            hub: hub.clone(),
            game_id: game_id.clone(),
            write_timeout: settings.subscriber.write_timeout(),
        });

        let server = HttpServer::new(move || {
            App::new().app_data(state.clone()).configure(configure)
        })
        .shutdown_timeout(settings.server.shutdown_timeout_seconds)
        .disable_signals()
        .listen(listener)?
        .run();
        let handle = server.handle();

        actix_web::rt::spawn(async move {
            if let Err(e) = server.await {
                warn!(error = %e, "http listener exited with error");
            }
            listener_done.complete();
        });

        info!(%local_addr, "board server listening");
        match viewer_url(&settings.server.board_url, local_addr, &game_id) {
            Ok(url) => info!(%url, "open the board viewer"),
            Err(e) => warn!(
                error = %e,
                board_url = %settings.server.board_url,
                "invalid board url"
            ),
        }

        Ok(Self {
            local_addr,
            game_id,
            hub,
            server: handle,
            completion,
            stopping: AtomicBool::new(false),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    /// Ends the game if needed, lets every viewer drain, then waits for both
    /// the hub and the listener to finish. Later calls only wait.
    pub async fn stop(&self) {
        if self.stopping.swap(true, Ordering::SeqCst) {
            self.completion.wait().await;
            return;
        }

        info!(game_id = %self.game_id, "stopping board server");
        match self.hub.end_game().await {
            Ok(())
            | Err(HubError::ProtocolViolation(
                ProtocolViolation::AlreadyEnded | ProtocolViolation::HubStopped,
            )) => {}
            Err(e) => warn!(error = %e, "failed to end game during stop"),
        }
        if let Err(e) = self.hub.request_shutdown().await {
            warn!(error = %e, "hub already gone during stop");
        }

        self.server.stop(true).await;
        self.completion.wait().await;
        info!(game_id = %self.game_id, "board server stopped");
    }
}

/// `{board_url}/?engine={http://host:port}&game={id}` with the query encoded.
pub fn viewer_url(
    board_url: &str,
    engine_addr: SocketAddr,
    game_id: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(board_url)?;
    url.query_pairs_mut()
        .append_pair("engine", &format!("http://{}", engine_addr))
        .append_pair("game", game_id);
    Ok(url)
}
