//! v3 client tests against an in-process gRPC synthesizer.

use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::{Stream, StreamExt};
use giztoy_yatts::v3::proto::{
    self, AudioChunk, UtteranceSynthesisRequest, UtteranceSynthesisResponse,
    synthesizer_server::{Synthesizer, SynthesizerServer},
};
use giztoy_yatts::v3::{AudioTemplate, AudioVariable, Client, SpeechOption, TextEntity};
use giztoy_yatts::{ApiKeyAuth, AudioFormat, Emotion, Error, IamTokenAuth, Voice};
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};

type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<UtteranceSynthesisResponse, Status>> + Send>>;

/// What the mock server received for one call.
#[derive(Debug, Clone)]
struct Seen {
    authorization: Option<String>,
    folder_id: Option<String>,
    request: UtteranceSynthesisRequest,
}

#[derive(Clone, Default)]
struct MockSynthesizer {
    chunks: Vec<&'static [u8]>,
    fail_with: Option<Status>,
    hang: bool,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockSynthesizer {
    fn with_chunks(chunks: Vec<&'static [u8]>) -> Self {
        Self {
            chunks,
            ..Default::default()
        }
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[tonic::async_trait]
impl Synthesizer for MockSynthesizer {
    type UtteranceSynthesisStream = ResponseStream;

    async fn utterance_synthesis(
        &self,
        request: Request<UtteranceSynthesisRequest>,
    ) -> Result<Response<Self::UtteranceSynthesisStream>, Status> {
        let meta = |key: &str| {
            request
                .metadata()
                .get(key)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let authorization = meta("authorization");
        let folder_id = meta("x-folder-id");
        self.seen.lock().unwrap().push(Seen {
            authorization: authorization.clone(),
            folder_id,
            request: request.get_ref().clone(),
        });

        if authorization.as_deref() == Some("Api-Key rejected") {
            return Err(Status::unauthenticated("unknown api key"));
        }

        let items: Vec<Result<UtteranceSynthesisResponse, Status>> = self
            .chunks
            .iter()
            .map(|data| {
                Ok(UtteranceSynthesisResponse {
                    audio_chunk: Some(AudioChunk {
                        data: data.to_vec(),
                    }),
                })
            })
            .collect();

        let mut stream: ResponseStream = Box::pin(futures::stream::iter(items));
        if let Some(status) = self.fail_with.clone() {
            // The server drops frames still buffered when an error follows
            // them immediately, so let the chunks flush first.
            let failure = futures::stream::once(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Err(status)
            });
            stream = Box::pin(stream.chain(failure));
        }
        if self.hang {
            stream = Box::pin(stream.chain(futures::stream::pending()));
        }
        Ok(Response::new(stream))
    }
}

async fn start_server(synthesizer: MockSynthesizer) -> String {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(
        tonic::transport::Server::builder()
            .add_service(SynthesizerServer::new(synthesizer))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );

    format!("http://{addr}")
}

fn client(endpoint: String) -> Client {
    Client::builder(ApiKeyAuth::new("test-key").with_folder_id("b1g"))
        .endpoint(endpoint)
        .default_option(SpeechOption::output_format(AudioFormat::OggOpus))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_speak_streams_chunks_in_order() {
    let mock = MockSynthesizer::with_chunks(vec![
        b"Ogg".as_slice(),
        b"S\x00".as_slice(),
        b"\x02".as_slice(),
    ]);
    let endpoint = start_server(mock.clone()).await;

    let mut stream = client(endpoint)
        .speak(
            &TextEntity::text("Привет"),
            &[SpeechOption::voice(Voice::Alena), SpeechOption::speed(1.2)],
        )
        .await
        .unwrap();

    let mut chunks = Vec::new();
    while let Some(chunk) = stream.next().await {
        chunks.push(chunk.unwrap().to_vec());
    }
    assert_eq!(chunks, vec![b"Ogg".to_vec(), b"S\x00".to_vec(), b"\x02".to_vec()]);

    let seen = mock.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Api-Key test-key"));
    assert_eq!(seen[0].folder_id.as_deref(), Some("b1g"));

    let request = &seen[0].request;
    assert_eq!(
        request.utterance,
        Some(proto::utterance_synthesis_request::Utterance::Text(
            "Привет".to_string()
        ))
    );
    assert_eq!(
        request.hints,
        vec![
            proto::Hints {
                hint: Some(proto::hints::Hint::Voice("alena".to_string())),
            },
            proto::Hints {
                hint: Some(proto::hints::Hint::Speed(1.2)),
            },
        ]
    );
}

#[tokio::test]
async fn test_receive_error_ends_stream() {
    let mock = MockSynthesizer {
        chunks: vec![b"first".as_slice()],
        fail_with: Some(Status::internal("synthesis backend failed")),
        ..Default::default()
    };
    let endpoint = start_server(mock).await;

    let mut stream = client(endpoint)
        .speak(&TextEntity::text("hi"), &[SpeechOption::voice(Voice::Jane)])
        .await
        .unwrap();

    assert_eq!(&stream.next().await.unwrap().unwrap()[..], b"first");
    let err = stream.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Grpc(ref status) if status.code() == tonic::Code::Internal));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_rejected_credentials() {
    let endpoint = start_server(MockSynthesizer::default()).await;

    let client = Client::builder(ApiKeyAuth::new("rejected"))
        .endpoint(endpoint)
        .build()
        .unwrap();

    let err = client
        .speak(
            &TextEntity::text("hi"),
            &[
                SpeechOption::voice(Voice::Jane),
                SpeechOption::output_format(AudioFormat::Mp3),
            ],
        )
        .await
        .unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_cancel_closes_stream() {
    let mock = MockSynthesizer {
        chunks: vec![b"chunk".as_slice()],
        hang: true,
        ..Default::default()
    };
    let endpoint = start_server(mock).await;

    let token = CancellationToken::new();
    let mut stream = client(endpoint)
        .speak_with_cancel(
            token.clone(),
            &TextEntity::text("hi"),
            &[SpeechOption::voice(Voice::Alena)],
        )
        .await
        .unwrap();

    assert_eq!(&stream.next().await.unwrap().unwrap()[..], b"chunk");

    token.cancel();
    let next = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("stream did not close after cancel");
    assert!(next.is_none());
}

#[tokio::test]
async fn test_template_request() {
    let mock = MockSynthesizer::with_chunks(vec![b"RIFF".as_slice()]);
    let endpoint = start_server(mock.clone()).await;

    let template = AudioTemplate::new("Hello, {name}!", vec![9u8; 8], AudioFormat::Wav)
        .text_variable("name", "Bob")
        .default_variable(
            "name",
            AudioVariable::new("Alice", Duration::from_millis(500), Duration::from_millis(700)),
        );

    let audio = client(endpoint)
        .speak(&TextEntity::audio_template(template), &[])
        .await
        .unwrap()
        .collect_bytes()
        .await
        .unwrap();
    assert_eq!(&audio[..], b"RIFF");

    let request = mock.seen().remove(0).request;
    assert_eq!(request.model, "zsl");

    let Some(proto::utterance_synthesis_request::Utterance::TextTemplate(tt)) = request.utterance
    else {
        panic!("expected text template utterance");
    };
    assert_eq!(tt.text_template, "Hello, {name}!");
    assert_eq!(tt.variables[0].variable_value, "Bob");

    assert_eq!(request.hints.len(), 2);
    let Some(proto::hints::Hint::AudioTemplate(ref at)) = request.hints[0].hint else {
        panic!("expected audio template hint");
    };
    assert_eq!(at.variables[0].variable_start_ms, 500);
    assert_eq!(at.variables[0].variable_length_ms, 700);
    // Template calls send the role hint even without an emotion.
    assert_eq!(
        request.hints[1].hint,
        Some(proto::hints::Hint::Role(String::new()))
    );
}

#[tokio::test]
async fn test_emotion_role_hint() {
    let mock = MockSynthesizer::with_chunks(vec![b"x".as_slice()]);
    let endpoint = start_server(mock.clone()).await;

    client(endpoint)
        .speak(
            &TextEntity::text("hi"),
            &[
                SpeechOption::voice(Voice::Alena),
                SpeechOption::emotion(Emotion::Good),
            ],
        )
        .await
        .unwrap()
        .collect_bytes()
        .await
        .unwrap();

    let request = mock.seen().remove(0).request;
    assert_eq!(
        request.hints.last().and_then(|h| h.hint.clone()),
        Some(proto::hints::Hint::Role("good".to_string()))
    );
}

#[tokio::test]
async fn test_errors_before_call() {
    let mock = MockSynthesizer::default();
    let endpoint = start_server(mock.clone()).await;
    let client = client(endpoint.clone());

    let err = client
        .speak(&TextEntity::text("hi"), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::VoiceNotSpecified));

    let empty = AudioTemplate::new("x", Vec::<u8>::new(), AudioFormat::Wav);
    let err = client
        .speak(&TextEntity::audio_template(empty), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyContent));

    let auth = IamTokenAuth::builder()
        .token_provider(|| Err("no token".into()))
        .build()
        .unwrap();
    let err = Client::builder(auth)
        .endpoint(endpoint)
        .build()
        .unwrap()
        .speak(
            &TextEntity::text("hi"),
            &[
                SpeechOption::voice(Voice::Alena),
                SpeechOption::output_format(AudioFormat::Wav),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(_)));

    assert!(mock.seen().is_empty());
}
