mod health;
mod helpers;
mod pages;
mod routing;
mod session;
