#[cfg(test)]
mod scripted_port;
