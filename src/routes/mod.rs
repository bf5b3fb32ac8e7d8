pub mod info_routes;
pub mod page;
pub mod view_routes;
