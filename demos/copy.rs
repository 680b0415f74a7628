use hostio::fs::{FileInput, FileOutput};
use hostio::{InputData, InputStream, OutputStreamExt};

fn main() {
    let mut args = std::env::args().skip(1);
    let from = args.next().expect("usage: copy <from> <to>");
    let to = args.next().expect("usage: copy <from> <to>");

    let mut input = FileInput::open(&from).expect("can't open the source file");
    let mut output = FileOutput::create(&to).expect("can't create the destination file");

    let mut buf = [0; 8192];
    let mut copied = 0u64;
    loop {
        let n = input.read(&mut buf);
        if n == 0 {
            break;
        }
        assert_eq!(output.write_full(&buf[..n]), n, "short write to {}", to);
        copied += n as u64;
    }

    println!("copied {} of {} bytes", copied, input.len());
}
