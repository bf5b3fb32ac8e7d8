pub mod lightwave_client;
