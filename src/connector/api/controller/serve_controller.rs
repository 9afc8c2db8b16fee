use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Result;

use crate::connector::web;

use super::super::Container;

pub struct ServeController<'a> {
    container: &'a Container,
}

impl<'a> ServeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn serve(&self, port: u16, public: bool) -> Result<String> {
        let addr = Self::bind_addr(port, public);
        web::serve(self.container.chat_session_use_case(), addr).await?;
        Ok("Server stopped.".to_string())
    }

    fn bind_addr(port: u16, public: bool) -> SocketAddr {
        let ip = if public {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };
        SocketAddr::new(ip, port)
    }
}
