use bytes::Bytes;
use color_eyre::eyre::{Result, WrapErr, eyre};
use fakehttp::{
    ConnectionFactory, FakeConnection, FakeHttpError, FixtureFactory, HANGING_STATUS,
    HttpConnection, RecordingSink,
};
use http::{Method, Uri};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Outcome of a minimal client exchange driven through `HttpConnection`
#[derive(Debug)]
struct Exchange {
    status: i32,
    body: Bytes,
    content_type: Option<String>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("fakehttp=debug")
        .with_test_writer()
        .try_init();
}

/// Sends `payload` (if any) and reads whichever body the status selects
fn send<C: HttpConnection>(conn: &mut C, payload: Option<&[u8]>) -> fakehttp::Result<Exchange> {
    if let Some(payload) = payload {
        conn.set_request_method(Method::POST)?;
        conn.set_do_output(true);
        conn.set_fixed_length_streaming_mode_long(payload.len() as i64)?;
    }
    conn.connect()?;
    if let Some(payload) = payload {
        let output = conn.output_stream()?;
        output.write_all(payload)?;
        output.flush()?;
    }

    let status = conn.response_code()?;
    let body = if status < 400 {
        match conn.input_stream()? {
            Some(body) => body.read_to_bytes()?,
            None => Bytes::new(),
        }
    } else {
        match conn.error_stream() {
            Some(body) => body.read_to_bytes()?,
            None => Bytes::new(),
        }
    };
    let content_type = conn.header_field("Content-Type").map(str::to_string);
    conn.disconnect();

    Ok(Exchange {
        status,
        body,
        content_type,
    })
}

#[test]
fn test_client_reads_successful_response() -> Result<()> {
    init_tracing();

    let mut conn = FakeConnection::successful(
        Some(Uri::from_static("http://example.com/items")),
        200,
        Some("[1,2,3]".into()),
    )?;
    conn.add_header("Content-Type", "application/json");

    let exchange = send(&mut conn, None).wrap_err("exchange failed")?;
    info!(?exchange, "exchange finished");

    assert_eq!(exchange.status, 200);
    assert_eq!(exchange.body, "[1,2,3]");
    assert_eq!(exchange.content_type.as_deref(), Some("application/json"));
    assert!(!conn.is_connected());
    assert!(!conn.do_output_called());
    Ok(())
}

#[test]
fn test_client_reads_error_body() -> Result<()> {
    init_tracing();

    let mut conn = FakeConnection::failed(None, 422, Some("invalid payload".into()))?;
    let exchange = send(&mut conn, Some(b"{}"))?;

    assert_eq!(exchange.status, 422);
    assert_eq!(exchange.body, "invalid payload");
    Ok(())
}

#[test]
fn test_client_writes_request_body() -> Result<()> {
    init_tracing();

    let recorder = RecordingSink::new();
    let mut conn = FakeConnection::successful(None, 201, None)?;
    conn.set_output_stream(Some(recorder.sink()));

    let exchange = send(&mut conn, Some(b"{\"name\":\"widget\"}"))?;

    assert_eq!(exchange.status, 201);
    assert!(exchange.body.is_empty());
    assert_eq!(recorder.contents(), "{\"name\":\"widget\"}");
    assert!(conn.do_output_called());
    assert!(conn.is_set_fixed_length_streaming_mode_long_called());
    assert!(!conn.is_set_fixed_length_streaming_mode_int_called());
    assert_eq!(conn.base().fixed_content_length(), Some(17));
    assert_eq!(conn.request_method(), &Method::POST);
    Ok(())
}

#[test]
fn test_client_fails_when_endpoint_refuses_writes() -> Result<()> {
    let mut conn = FakeConnection::successful(None, 200, None)?;
    conn.set_output_stream(None);

    match send(&mut conn, Some(b"data")) {
        Err(FakeHttpError::Unsupported(msg)) => assert!(msg.contains("output")),
        other => return Err(eyre!("expected unsupported output, got {other:?}")),
    }
    Ok(())
}

#[test]
fn test_client_surfaces_response_code_error() -> Result<()> {
    let error = Arc::new(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"));
    let mut conn = FakeConnection::with_response_code_error(None, Arc::clone(&error));

    match send(&mut conn, None) {
        Err(FakeHttpError::ResponseCode(e)) => assert!(Arc::ptr_eq(&e, &error)),
        other => return Err(eyre!("expected response code error, got {other:?}")),
    }
    Ok(())
}

#[test]
fn test_client_retries_through_factory() -> Result<()> {
    init_tracing();

    let mut factory = FixtureFactory::new();
    factory
        .push(FakeConnection::failed(None, 503, Some("busy".into()))?)
        .push(FakeConnection::successful(None, 200, Some("done".into()))?);

    let url = Uri::from_static("http://example.com/jobs/1");
    let mut last = None;
    for attempt in 1..=3 {
        let mut conn = factory.open_connection(&url)?;
        let exchange = send(&mut conn, None)?;
        info!(attempt, status = exchange.status, "attempt finished");
        let done = exchange.status < 400;
        last = Some(exchange);
        if done {
            break;
        }
    }

    let last = last.ok_or_else(|| eyre!("no attempt made"))?;
    assert_eq!(last.status, 200);
    assert_eq!(last.body, "done");
    assert_eq!(factory.opened_urls().len(), 2);
    assert_eq!(factory.remaining(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_hanging_fixture_trips_caller_timeout() -> Result<()> {
    init_tracing();

    let mut conn = FakeConnection::hanging(None);
    conn.connect()?;

    let poll = async {
        loop {
            let code = conn.response_code()?;
            if code != HANGING_STATUS {
                return Ok::<i32, FakeHttpError>(code);
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    };

    let outcome = tokio::time::timeout(Duration::from_secs(2), poll).await;
    assert!(outcome.is_err(), "hanging fixture resolved a status");
    assert_eq!(conn.response_code()?, HANGING_STATUS);
    Ok(())
}
