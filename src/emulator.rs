use std::{fmt::Write, sync::Arc, time::Duration};

use axum::{Router, extract::State, response::Html, routing::get};
use tokio::time::Instant;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::prelude::*;

/// Fake inverter which produces at the constant power since it started.
pub struct Emulator {
    started_at: Instant,
    daily_energy_at_start: f64,
}

impl Emulator {
    const PHASE_POWER: f64 = 1500.0;

    pub fn router(path: &str) -> Router {
        let emulator = Self { started_at: Instant::now(), daily_energy_at_start: 12.5 };
        Router::new()
            .route(path, get(get_page))
            .with_state(Arc::new(emulator))
            .layer((TraceLayer::new_for_http(), TimeoutLayer::new(Duration::from_secs(10))))
    }

    fn render(&self) -> String {
        let total_power = 3.0 * Self::PHASE_POWER;
        let daily_energy = self.daily_energy_at_start
            + total_power / 1000.0 * self.started_at.elapsed().as_secs_f64() / 3600.0;
        let readings = [
            ("PAC", total_power.to_string()),
            ("PACL1", Self::PHASE_POWER.to_string()),
            ("PACL2", Self::PHASE_POWER.to_string()),
            ("PACL3", Self::PHASE_POWER.to_string()),
            ("UDC1", "380".to_owned()),
            ("UDC2", "375".to_owned()),
            ("UDC3", "370".to_owned()),
            ("IDC1", "8,2".to_owned()),
            ("IDC2", "8,3".to_owned()),
            ("IDC3", "8,4".to_owned()),
            ("ET", format!("{daily_energy:.3}").replace('.', ",")),
            ("EG", "5200".to_owned()),
            ("ETA", "96,3".to_owned()),
            ("SN", "104711".to_owned()),
        ];

        let mut rows = String::new();
        for (index, (key, value)) in readings.iter().enumerate() {
            let _ = writeln!(
                rows,
                "<tr><td>{}</td><td>{key}</td><td>:</td><td>{value}&nbsp;</td></tr>",
                index + 1,
            );
        }
        format!(
            "<html>\n<body>\n<h1>SOLPLUS 100<br>Solutronic AG</h1>\n<p>FW-Release: 3.1.2</p>\n\
             <table>\n{rows}</table>\n</body>\n</html>\n"
        )
    }
}

#[instrument(skip_all)]
async fn get_page(State(emulator): State<Arc<Emulator>>) -> Html<String> {
    debug!("serving the page…");
    Html(emulator.render())
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;
    use crate::{
        api::solutronic::{
            Fetcher,
            HostKey,
            HttpTransport,
            Resolver,
            Transport,
            TransportError,
            extract_metadata,
            parse_readings,
        },
        core::keys,
    };

    #[test]
    fn render_ok() {
        let emulator = Emulator { started_at: Instant::now(), daily_energy_at_start: 12.5 };
        let readings = parse_readings(&emulator.render());
        assert_eq!(readings.len(), 14);
        assert_eq!(readings.number("IDC2"), Some(8.3));
        assert_eq!(readings.number(keys::DEVICE_LIFETIME_ENERGY), Some(5200.0));
        assert!(readings.number(keys::DAILY_ENERGY).is_some_and(|daily| daily >= 12.5));
    }

    #[tokio::test]
    async fn fetch_from_emulator_ok() -> Result {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let server = tokio::spawn(async move {
            axum::serve(listener, Emulator::router("/solutronic/")).await
        });

        let resolver = Resolver::builder()
            .transport(Arc::new(HttpTransport::new()?))
            .ports(vec![port])
            .build();
        let fetcher = Fetcher::new(resolver, Fetcher::DEFAULT_TIMEOUT);
        let body = fetcher.fetch(&HostKey::parse("127.0.0.1")?).await?;
        server.abort();

        let readings = parse_readings(&body);
        assert_eq!(readings.number("PACL1"), Some(1500.0));
        assert_eq!(readings.number("ETA"), Some(96.3));
        let metadata = extract_metadata(&body);
        assert_eq!(metadata.model.as_deref(), Some("SOLPLUS 100"));
        assert_eq!(metadata.firmware.as_deref(), Some("3.1.2"));
        Ok(())
    }

    #[tokio::test]
    async fn not_found_elsewhere() -> Result {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let server = tokio::spawn(async move {
            axum::serve(listener, Emulator::router("/solutronic/")).await
        });

        let resolver = Resolver::builder()
            .transport(Arc::new(HttpTransport::new()?))
            .ports(vec![port])
            .paths(vec!["/".to_owned()])
            .build();
        let result = resolver.resolve(&HostKey::parse("127.0.0.1")?).await;
        server.abort();

        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn silent_server_times_out() -> Result {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        // Accepts the connections and never answers:
        let server = tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });

        let url: reqwest::Url = format!("http://127.0.0.1:{port}/solutronic/").parse()?;
        let result = HttpTransport::new()?.get(&url, Duration::from_millis(50)).await;
        server.abort();

        assert!(matches!(result, Err(TransportError::Timeout)));
        Ok(())
    }
}
