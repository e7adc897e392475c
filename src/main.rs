fn main() -> anyhow::Result<()> {
    shaderbox::run()
}
