// src/web/flash.rs
//! Mensagens de uma só leitura entre um POST e o redirect seguinte,
//! guardadas num cookie assinado.
use crate::{
    models::notice::{Notice, NoticeLevel},
    templates::FlashView,
};
use tower_cookies::{Cookie, Cookies, Key};

const FLASH_COOKIE: &str = "flash";

pub fn set_flash(cookies: &Cookies, key: &Key, notice: &Notice) {
    // "nivel|mensagem", com a mensagem codificada para caber num cookie
    let value = format!("{}|{}", notice.level.as_str(), urlencoding::encode(&notice.message));
    let cookie = Cookie::build((FLASH_COOKIE, value)).path("/").http_only(true).build();
    cookies.signed(key).add(cookie);
}

/// Lê e apaga a mensagem pendente.
pub fn take_flash(cookies: &Cookies, key: &Key) -> Option<FlashView> {
    let signed = cookies.signed(key);
    let cookie = signed.get(FLASH_COOKIE)?;
    signed.remove(Cookie::build(FLASH_COOKIE).path("/").build());

    let (level, encoded) = cookie.value().split_once('|')?;
    let message = urlencoding::decode(encoded).ok()?.into_owned();
    Some(FlashView::from(Notice::new(NoticeLevel::parse(level), message)))
}
