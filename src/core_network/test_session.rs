// End-to-end sessions against a real server on 127.0.0.1

use crate::config::Config;
use crate::constants::MAX_COMMAND_LINE;
use crate::core_auth::{PasswdDatabase, UserRegistry};
use crate::core_network::{FtpServer, PortPool};
use crate::core_quota::{DiskQuota, QuotaGuard};
use crate::core_tls::tls_connection::test_support;
use crate::server::ServerContext;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_rustls::rustls;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::TlsConnector;

const WAIT: Duration = Duration::from_secs(5);

struct TestServer {
    server: FtpServer,
    addr: SocketAddr,
    base: TempDir,
    _etc: TempDir,
    registry: Arc<PasswdDatabase>,
    client_tls: Option<Arc<rustls::ClientConfig>>,
    _task: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start(default_quota: u64, with_tls: bool) -> Self {
        let base = tempfile::tempdir().unwrap();
        let etc = tempfile::tempdir().unwrap();

        let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let min_port = probe.local_addr().unwrap().port().min(65_000);
        drop(probe);

        let mut config = Config::default();
        config.server.listen_address = Ipv4Addr::LOCALHOST;
        config.server.listen_port = 0;
        config.server.base_dir = base.path().to_path_buf();
        config.server.passwd_file = etc.path().join("passwd");
        config.data.bind_address = Ipv4Addr::LOCALHOST;
        config.data.min_port = min_port;
        config.data.max_port = min_port + 32;
        config.data.accept_timeout_secs = 5;
        config.quota.default_total_bytes = default_quota;

        let database = Arc::new(
            PasswdDatabase::load(&config.server.passwd_file, true, default_quota)
                .unwrap()
                .with_cost(4),
        );
        let (tls, client_tls) = if with_tls {
            let (server_tls, client_tls) = test_support::self_signed(etc.path());
            (Some(Arc::new(server_tls)), Some(client_tls))
        } else {
            (None, None)
        };

        let context = ServerContext {
            auth: database.clone(),
            registry: database.clone(),
            quota: QuotaGuard::new(Arc::new(DiskQuota::new(
                base.path().to_path_buf(),
                default_quota,
                database.clone(),
            ))),
            tls,
            ports: Arc::new(PortPool::from_config(&config.data)),
            config: Arc::new(config),
        };

        let server = FtpServer::new(context);
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = {
            let server = server.clone();
            tokio::spawn(async move { server.run(listener).await })
        };

        Self {
            server,
            addr,
            base,
            _etc: etc,
            registry: database,
            client_tls,
            _task: task,
        }
    }

    fn user_dir(&self, username: &str) -> PathBuf {
        self.base.path().join(username)
    }

    async fn connect(&self) -> Client<TcpStream> {
        let socket = TcpStream::connect(self.addr).await.unwrap();
        let mut client = Client {
            stream: BufReader::new(socket),
        };
        assert!(client.reply().await.starts_with("220"));
        client
    }

    async fn login_anonymous(&self) -> Client<TcpStream> {
        let mut client = self.connect().await;
        assert!(client.command("USER anonymous").await.starts_with("331"));
        assert!(client.command("PASS guest@example.com").await.starts_with("230"));
        client
    }
}

struct Client<S> {
    stream: BufReader<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Client<S> {
    /// Reads one reply; multi-line replies are returned whole.
    async fn reply(&mut self) -> String {
        let mut first = String::new();
        timeout(WAIT, self.stream.read_line(&mut first))
            .await
            .unwrap()
            .unwrap();
        assert!(first.len() >= 4, "connection closed instead of a reply");

        let mut all = first.clone();
        if first.as_bytes()[3] == b'-' {
            let end = format!("{} ", &first[..3]);
            loop {
                let mut line = String::new();
                let n = timeout(WAIT, self.stream.read_line(&mut line))
                    .await
                    .unwrap()
                    .unwrap();
                assert!(n > 0);
                all.push_str(&line);
                if line.starts_with(&end) {
                    break;
                }
            }
        }
        all.trim_end().to_string()
    }

    async fn send(&mut self, line: &str) {
        let writer = self.stream.get_mut();
        writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
        writer.flush().await.unwrap();
    }

    async fn command(&mut self, line: &str) -> String {
        self.send(line).await;
        self.reply().await
    }

    /// True once the server has closed the control connection.
    async fn is_closed(&mut self) -> bool {
        let mut rest = String::new();
        matches!(
            timeout(WAIT, self.stream.read_line(&mut rest)).await,
            Ok(Ok(0)) | Ok(Err(_))
        )
    }
}

fn pasv_port(reply: &str) -> u16 {
    let start = reply.find('(').unwrap() + 1;
    let end = reply.find(')').unwrap();
    let numbers: Vec<u16> = reply[start..end]
        .split(',')
        .map(|n| n.parse().unwrap())
        .collect();
    assert_eq!(&numbers[..4], &[127, 0, 0, 1]);
    numbers[4] * 256 + numbers[5]
}

#[tokio::test]
async fn test_user_not_followed_by_pass_stays_logged_out() {
    let ts = TestServer::start(1024, false).await;
    let mut client = ts.connect().await;

    assert!(client.command("USER anonymous").await.starts_with("331"));
    assert!(client.command("PWD").await.starts_with("501"));
    assert!(client.command("PWD").await.starts_with("530"));
    assert!(client.command("LIST").await.starts_with("530"));

    assert!(client.command("USER bob").await.starts_with("331"));
    assert!(client.command("PASS wrong").await.starts_with("530"));
    assert!(client.command("PWD").await.starts_with("530"));

    assert!(client.command("PASS lonely").await.starts_with("503"));
}

#[tokio::test]
async fn test_parsing_and_login_gate() {
    let ts = TestServer::start(1024, false).await;
    let mut client = ts.connect().await;

    assert!(client.command("noop").await.starts_with("500"));
    assert!(client.command("XYZZY now").await.starts_with("500"));
    assert!(client.command("NOOP").await.starts_with("200"));
    assert!(client.command("SYST").await.starts_with("215"));
    assert!(client.command("TYPE I").await.starts_with("200"));
    assert!(client.command("TYPE E").await.starts_with("504"));
    assert!(client.command("MKD x").await.starts_with("530"));

    let feat = client.command("FEAT").await;
    assert!(feat.starts_with("211-"));
    assert!(feat.contains(" EPSV"));
    assert!(feat.ends_with("211 End"));
}

#[tokio::test]
async fn test_anonymous_login_and_directories() {
    let ts = TestServer::start(1024, false).await;
    let mut client = ts.login_anonymous().await;
    assert!(ts.user_dir("anonymous").is_dir());

    assert_eq!(client.command("PWD").await, "257 \"/\" is current directory.");
    assert!(client.command("CWD docs").await.starts_with("250"));
    assert!(ts.user_dir("anonymous").join("docs").is_dir());
    assert_eq!(client.command("PWD").await, "257 \"/docs\" is current directory.");

    assert!(client.command("CWD ../../..").await.starts_with("250"));
    assert_eq!(client.command("PWD").await, "257 \"/\" is current directory.");

    assert!(client.command("CWD a\\b").await.starts_with("504"));
    assert!(client.command("CWD").await.starts_with("501"));
    assert!(client.command("CWD    ").await.starts_with("501"));

    assert!(client.command("MKD reports").await.starts_with("257"));
    assert!(client.command("MKD reports").await.starts_with("550"));
    assert!(client.command("RMD /").await.starts_with("550"));
    assert!(client.command("RMD reports").await.starts_with("250"));
    assert!(!ts.user_dir("anonymous").join("reports").exists());

    assert!(client.command("QUIT").await.starts_with("221"));
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_rename_dialog() {
    let ts = TestServer::start(1024, false).await;
    let mut client = ts.login_anonymous().await;
    let home = ts.user_dir("anonymous");
    std::fs::write(home.join("a.txt"), b"abc").unwrap();

    assert!(client.command("RNFR a.txt").await.starts_with("350"));
    assert!(client.command("RNTO b.txt").await.starts_with("250"));
    assert!(!home.join("a.txt").exists());
    assert!(home.join("b.txt").exists());

    assert!(client.command("RNFR b.txt").await.starts_with("350"));
    assert!(client.command("DELE b.txt").await.starts_with("503"));
    assert!(home.join("b.txt").exists());
    assert!(client.command("NOOP").await.starts_with("200"));

    assert!(client.command("RNFR b.txt").await.starts_with("350"));
    assert!(client.command("RNTO").await.starts_with("501"));
    assert!(home.join("b.txt").exists());

    assert!(client.command("RNTO c.txt").await.starts_with("503"));
    assert!(client.command("RNFR missing.txt").await.starts_with("550"));
}

#[tokio::test]
async fn test_passive_listing_and_download() {
    let ts = TestServer::start(1024 * 1024, false).await;
    let mut client = ts.login_anonymous().await;
    let home = ts.user_dir("anonymous");
    std::fs::write(home.join("hello.txt"), b"hello, world").unwrap();
    std::fs::create_dir(home.join("sub")).unwrap();

    let port = pasv_port(&client.command("PASV").await);
    let mut data = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    assert!(client.command("LIST").await.starts_with("150"));
    let mut listing = String::new();
    data.read_to_string(&mut listing).await.unwrap();
    assert!(client.reply().await.starts_with("226"));

    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('-') && lines[0].ends_with(" hello.txt"));
    assert!(lines[1].starts_with('d') && lines[1].ends_with(" sub"));

    let reply = client.command("EPSV").await;
    assert!(reply.starts_with("229"));
    let start = reply.find("(|||").unwrap() + 4;
    let end = reply.find("|)").unwrap();
    let port: u16 = reply[start..end].parse().unwrap();
    let mut data = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    assert!(client.command("RETR hello.txt").await.starts_with("150"));
    let mut content = Vec::new();
    data.read_to_end(&mut content).await.unwrap();
    assert!(client.reply().await.starts_with("226"));
    assert_eq!(content, b"hello, world");

    assert_eq!(client.command("SIZE hello.txt").await, "213 12");
    assert!(client.command("MDTM hello.txt").await.starts_with("213 "));
    assert!(client.command("RETR nothing.txt").await.starts_with("550"));

    let mlst = client.command("MLST hello.txt").await;
    assert!(mlst.starts_with("250-"));
    assert!(mlst.contains("Type=file;Size=12;"));
}

#[tokio::test]
async fn test_active_upload() {
    let ts = TestServer::start(1024 * 1024, false).await;
    let mut client = ts.login_anonymous().await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let reply = client
        .command(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256))
        .await;
    assert!(reply.starts_with("200"));
    assert!(client.command("PORT 1,2,3").await.starts_with("501"));

    client.send("STOR upload.bin").await;
    let (mut data, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    assert!(client.reply().await.starts_with("150"));
    data.write_all(&[42u8; 5000]).await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    assert!(client.reply().await.starts_with("226"));

    let stored = std::fs::read(ts.user_dir("anonymous").join("upload.bin")).unwrap();
    assert_eq!(stored.len(), 5000);
}

#[tokio::test]
async fn test_upload_over_quota_ends_session() {
    let ts = TestServer::start(10, false).await;
    let mut client = ts.login_anonymous().await;

    let port = pasv_port(&client.command("PASV").await);
    let mut data = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    assert!(client.command("STOR first.bin").await.starts_with("150"));
    data.write_all(&[1u8; 100]).await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    assert!(client.reply().await.starts_with("226"));

    pasv_port(&client.command("PASV").await);
    let reply = client.command("STOR second.bin").await;
    assert!(reply.starts_with("552"), "unexpected reply: {}", reply);
    assert!(client.is_closed().await);

    let home = ts.user_dir("anonymous");
    assert!(!home.join("second.bin").exists());
    assert_eq!(std::fs::metadata(home.join("first.bin")).unwrap().len(), 100);
}

#[tokio::test]
async fn test_site_reg_then_login() {
    let ts = TestServer::start(4096, false).await;
    let mut client = ts.login_anonymous().await;

    assert!(client.command("SITE REG bob hunter2").await.starts_with("200"));
    assert!(client.command("SITE REG bob again").await.starts_with("550"));
    assert!(client.command("SITE REG onlyname").await.starts_with("501"));
    assert!(client.command("SITE WHO").await.starts_with("502"));

    assert!(client.command("USER bob").await.starts_with("331"));
    assert!(client.command("PASS hunter2").await.starts_with("230"));
    assert!(ts.user_dir("bob").is_dir());
    assert!(ts.registry.register("bob", "x").is_err());
}

#[tokio::test]
async fn test_options_and_buffer_size() {
    let ts = TestServer::start(1024, false).await;
    let mut client = ts.connect().await;

    assert!(client.command("OPTS UTF8 OFF").await.starts_with("200"));
    assert!(client.command("OPTS UTF8 ON").await.starts_with("200"));
    assert!(client.command("OPTS MLST type").await.starts_with("501"));
    assert!(client.command("CLNT test-suite 1.0").await.starts_with("200"));

    assert_eq!(client.command("PBSZ 0").await, "200 PBSZ=262144");
    assert_eq!(client.command("PBSZ 1").await, "200 PBSZ=4096");
    assert!(client.command("PBSZ lots").await.starts_with("501"));

    assert!(client.command("AUTH TLS").await.starts_with("534"));
    assert!(client.command("PROT P").await.starts_with("534"));
}

#[tokio::test]
async fn test_auth_tls_and_protected_data_channel() {
    let ts = TestServer::start(1024 * 1024, true).await;
    let client_tls = ts.client_tls.clone().unwrap();
    let mut client = ts.connect().await;

    assert!(client.command("AUTH TLS").await.starts_with("234"));
    let socket = client.stream.into_inner();
    let connector = TlsConnector::from(client_tls.clone());
    let tls = connector
        .connect(ServerName::try_from("localhost").unwrap(), socket)
        .await
        .unwrap();
    let mut client = Client {
        stream: BufReader::new(tls),
    };

    assert!(client.command("NOOP").await.starts_with("200"));
    assert!(client.command("USER anonymous").await.starts_with("331"));
    assert!(client.command("PASS guest").await.starts_with("230"));
    std::fs::write(ts.user_dir("anonymous").join("secret.txt"), b"top secret").unwrap();

    assert!(client.command("PBSZ 0").await.starts_with("200"));
    assert!(client.command("PROT P").await.starts_with("200"));
    let port = pasv_port(&client.command("PASV").await);
    let data_task = tokio::spawn(async move {
        let socket = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        let connector = TlsConnector::from(client_tls);
        let mut tls = connector
            .connect(ServerName::try_from("localhost").unwrap(), socket)
            .await
            .unwrap();
        let mut content = Vec::new();
        tls.read_to_end(&mut content).await.unwrap();
        content
    });
    assert!(client.command("RETR secret.txt").await.starts_with("150"));
    assert!(client.reply().await.starts_with("226"));
    assert_eq!(data_task.await.unwrap(), b"top secret");

    assert!(client.command("PROT C").await.starts_with("200"));
    let port = pasv_port(&client.command("PASV").await);
    let mut data = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    assert!(client.command("RETR secret.txt").await.starts_with("150"));
    let mut content = Vec::new();
    data.read_to_end(&mut content).await.unwrap();
    assert!(client.reply().await.starts_with("226"));
    assert_eq!(content, b"top secret");
}

#[tokio::test]
async fn test_forced_shutdown_closes_idle_session() {
    let ts = TestServer::start(1024, false).await;
    let mut client = ts.login_anonymous().await;

    timeout(WAIT, ts.server.stop(false)).await.unwrap();
    assert!(client.is_closed().await);
    assert_eq!(ts.server.active_sessions().await, 0);
}

#[tokio::test]
async fn test_graceful_shutdown_waits_for_quit() {
    let ts = TestServer::start(1024, false).await;
    let mut client = ts.connect().await;
    assert!(client.command("NOOP").await.starts_with("200"));
    timeout(WAIT, async {
        while ts.server.active_sessions().await == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    let server = ts.server.clone();
    let stopping = tokio::spawn(async move { server.stop(true).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!stopping.is_finished());

    assert!(client.command("NOOP").await.starts_with("200"));
    assert!(client.command("QUIT").await.starts_with("221"));
    timeout(WAIT, stopping).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_forced_shutdown_interrupts_pending_tls_handshake() {
    let ts = TestServer::start(1024, true).await;
    let mut client = ts.connect().await;

    // The client never starts the handshake after the go-ahead.
    assert!(client.command("AUTH TLS").await.starts_with("234"));

    timeout(Duration::from_secs(2), ts.server.stop(false))
        .await
        .unwrap();
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_failed_stor_keeps_existing_file() {
    let ts = TestServer::start(1024 * 1024, false).await;
    let mut client = ts.login_anonymous().await;
    let target = ts.user_dir("anonymous").join("keep.txt");
    std::fs::write(&target, b"precious data").unwrap();

    assert!(client.command("STOR keep.txt").await.starts_with("150"));
    assert!(client.reply().await.starts_with("425"));
    assert_eq!(std::fs::read(&target).unwrap(), b"precious data");

    let port = pasv_port(&client.command("PASV").await);
    let mut data = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    assert!(client.command("STOR keep.txt").await.starts_with("150"));
    data.write_all(b"fresh").await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    assert!(client.reply().await.starts_with("226"));
    assert_eq!(std::fs::read(&target).unwrap(), b"fresh");
}

#[tokio::test]
async fn test_overlong_command_line_is_rejected() {
    let ts = TestServer::start(1024, false).await;
    let mut client = ts.connect().await;

    let reply = client.command(&"A".repeat(3 * MAX_COMMAND_LINE)).await;
    assert!(reply.starts_with("500"), "unexpected reply: {}", reply);
    assert!(client.command("NOOP").await.starts_with("200"));
}

#[tokio::test]
async fn test_client_accepted_after_stop_is_not_served() {
    let ts = TestServer::start(1024, false).await;
    timeout(WAIT, ts.server.stop(true)).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut client = TcpStream::connect(listener.local_addr().unwrap())
        .await
        .unwrap();
    let (socket, peer) = listener.accept().await.unwrap();

    assert!(!ts.server.start_session(socket, peer).await);
    assert_eq!(ts.server.active_sessions().await, 0);
    let mut rest = Vec::new();
    let read = timeout(WAIT, client.read_to_end(&mut rest)).await.unwrap();
    assert!(read.is_err() || rest.is_empty());
}
