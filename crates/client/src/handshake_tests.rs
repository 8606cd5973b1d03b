use rq_core::RunQueueError;
use rq_transport::{crypto, frame, FrameType, LoginBody, StateBody, StateKind};
use tokio::net::{TcpListener, TcpStream};

use super::connect;

/// A minimal stand-in for `rq-server`'s authenticator (§4.5), enough to
/// drive the client side of the handshake without depending on
/// `rq-server`'s private `auth` module.
async fn fake_server(mut stream: TcpStream, expected_password: &str) {
    let pubkey_frame = frame::read_frame(&mut stream, None).await.unwrap();
    assert_eq!(pubkey_frame.frame_type, FrameType::PubKey);
    let client_public_key = crypto::decode_public_key(&pubkey_frame.body).unwrap();

    let session_key = crypto::generate_session_key();
    let encrypted_key = crypto::rsa_encrypt(&client_public_key, &session_key).unwrap();
    frame::write_plain(&mut stream, FrameType::SessionKey, &encrypted_key)
        .await
        .unwrap();

    let login_frame = frame::read_frame(&mut stream, Some(&session_key)).await.unwrap();
    assert_eq!(login_frame.frame_type, FrameType::Login);
    let login: LoginBody = serde_json::from_slice(&login_frame.body).unwrap();

    let state = if login.password == expected_password {
        StateBody {
            kind: StateKind::LoginAccepted,
            message: "welcome".to_string(),
        }
    } else {
        StateBody {
            kind: StateKind::LoginError,
            message: "bad password".to_string(),
        }
    };
    let body = serde_json::to_vec(&state).unwrap();
    frame::write_encrypted(&mut stream, FrameType::State, &body, &session_key)
        .await
        .unwrap();
}

async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

#[tokio::test]
async fn correct_password_yields_a_session_key() {
    let (listener, addr) = listen().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        fake_server(stream, "sesame").await;
    });

    let handshake = connect(&addr, "sesame").await.unwrap();
    assert_ne!(handshake.session_key, [0u8; rq_transport::SESSION_KEY_LEN]);

    server.await.unwrap();
}

#[tokio::test]
async fn wrong_password_is_reported_as_authentication_error() {
    let (listener, addr) = listen().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        fake_server(stream, "sesame").await;
    });

    let err = connect(&addr, "wrong").await.unwrap_err();
    assert!(matches!(err, RunQueueError::AuthenticationError(_)));

    server.await.unwrap();
}
