use std::str::FromStr;

use anyhow::Result;
use indoc::indoc;
use pep440_rs::VersionSpecifiers;

use repodex_simple::{ArchiveLink, HashAlgorithm, HashDigest, parse_archive_links};

#[test]
fn pypi_page() -> Result<()> {
    let html = indoc! {r#"
        <!DOCTYPE html>
        <html>
          <head>
            <meta name="pypi:repository-version" content="1.1">
            <title>Links for numpy</title>
          </head>
          <body>
            <h1>Links for numpy</h1>
            <a href="https://files.pythonhosted.org/packages/5c/2e/5c0eee0635035a7e0646734e2b9388e17a97f6f2087e15141a218b6f2b6d/numpy-1.13.0rc1-cp36-none-win_amd64.whl#sha256=8e8e1ccf025c8b6a821f75086a364a68d9e1877519a35bf8facec9e5120836f4" data-requires-python="&gt;=2.7,!=3.0.*,!=3.1.*,!=3.2.*,!=3.3.*">numpy-1.13.0rc1-cp36-none-win_amd64.whl</a><br />
            <a href="https://files.pythonhosted.org/packages/ab/cd/numpy-1.26.0.tar.gz#sha256=f93fc78fe8bf15afe2b8d6b6499f1c73953169fad1e9a8dd086cdff3190e7fdf" data-requires-python="&lt;3.13,&gt;=3.9" data-dist-info-metadata="sha256=1a2b" data-core-metadata="sha256=1a2b">numpy-1.26.0.tar.gz</a><br />
            <a href="https://files.pythonhosted.org/packages/ef/01/numpy-1.26.1.tar.gz#sha256=c8c6c72d4a9f831f328efb1312642a1cafafaa88981d9ab76368d50d07d93cbe" data-requires-python="&lt;3.13,&gt;=3.9" data-yanked="Incorrect metadata">numpy-1.26.1.tar.gz</a><br />
          </body>
        </html>
        <!--SERIAL 21934598-->
    "#};
    let parsed = parse_archive_links(html)?;
    assert!(parsed.diagnostics.is_empty());

    let links = parsed.value;
    assert_eq!(links.len(), 3);
    assert!(links.contains(&ArchiveLink {
        requires_python: Some(VersionSpecifiers::from_str(
            ">=2.7,!=3.0.*,!=3.1.*,!=3.2.*,!=3.3.*"
        )?),
        hash: Some(HashDigest::new(
            HashAlgorithm::Sha256,
            "8e8e1ccf025c8b6a821f75086a364a68d9e1877519a35bf8facec9e5120836f4"
        )),
        ..ArchiveLink::new(
            "numpy-1.13.0rc1-cp36-none-win_amd64.whl",
            "https://files.pythonhosted.org/packages/5c/2e/5c0eee0635035a7e0646734e2b9388e17a97f6f2087e15141a218b6f2b6d/numpy-1.13.0rc1-cp36-none-win_amd64.whl",
        )
    }));

    insta::assert_json_snapshot!(&links[1..], @r#"
    [
      {
        "filename": "numpy-1.26.0.tar.gz",
        "url": "https://files.pythonhosted.org/packages/ab/cd/numpy-1.26.0.tar.gz",
        "requires_python": ">=3.9, <3.13",
        "hash": {
          "algorithm": "sha256",
          "digest": "f93fc78fe8bf15afe2b8d6b6499f1c73953169fad1e9a8dd086cdff3190e7fdf"
        },
        "gpg_sig": null,
        "yanked": null,
        "metadata": {
          "hash": {
            "algorithm": "sha256",
            "digest": "1a2b"
          }
        }
      },
      {
        "filename": "numpy-1.26.1.tar.gz",
        "url": "https://files.pythonhosted.org/packages/ef/01/numpy-1.26.1.tar.gz",
        "requires_python": ">=3.9, <3.13",
        "hash": {
          "algorithm": "sha256",
          "digest": "c8c6c72d4a9f831f328efb1312642a1cafafaa88981d9ab76368d50d07d93cbe"
        },
        "gpg_sig": null,
        "yanked": "Incorrect metadata",
        "metadata": null
      }
    ]
    "#);
    Ok(())
}

#[test]
fn pytorch_page() -> Result<()> {
    let html = indoc! {r#"
        <!DOCTYPE html>
        <html>
          <body>
            <h1>Links for torchvision</h1>
            <a href="cu100/torchvision-0.5.0%2Bcu100-cp36-cp36m-linux_x86_64.whl">cu100/torchvision-0.5.0%2Bcu100-cp36-cp36m-linux_x86_64.whl</a><br>
            <a href="cpu/torchvision-0.5.0%2Bcpu-cp36-cp36m-linux_x86_64.whl">cpu/torchvision-0.5.0%2Bcpu-cp36-cp36m-linux_x86_64.whl</a><br>
          </body>
        </html>
    "#};
    let links = parse_archive_links(html)?.into_value();
    assert_eq!(
        links,
        vec![
            ArchiveLink::new(
                "torchvision-0.5.0+cu100-cp36-cp36m-linux_x86_64.whl",
                "cu100/torchvision-0.5.0%2Bcu100-cp36-cp36m-linux_x86_64.whl",
            ),
            ArchiveLink::new(
                "torchvision-0.5.0+cpu-cp36-cp36m-linux_x86_64.whl",
                "cpu/torchvision-0.5.0%2Bcpu-cp36-cp36m-linux_x86_64.whl",
            ),
        ]
    );
    Ok(())
}

#[test]
fn piwheels_page() -> Result<()> {
    let html = indoc! {r##"
        <!DOCTYPE html>
        <html>
        <head>
        <title>Links for numpy</title>
        </head>
        <body>
        <h1>Links for numpy</h1>
        <a href="numpy-1.10.4-cp35-cp35m-linux_armv7l.whl#sha256=5768279588a4766adb0211bbaa0f5857be38483c5aafe5d1caecbcd32749966e">numpy-1.10.4-cp35-cp35m-linux_armv7l.whl</a><br>
        <a href="tensorflow-2.0.0-cp37-cp37m-linux_x86_64.whl">tensorflow-2.0.0-cp37-cp37m-linux_x86_64.whl</a><br>
        </body>
        </html>
    "##};
    let links = parse_archive_links(html)?.into_value();
    assert_eq!(
        links,
        vec![
            ArchiveLink {
                hash: Some(HashDigest::new(
                    HashAlgorithm::Sha256,
                    "5768279588a4766adb0211bbaa0f5857be38483c5aafe5d1caecbcd32749966e"
                )),
                ..ArchiveLink::new(
                    "numpy-1.10.4-cp35-cp35m-linux_armv7l.whl",
                    "numpy-1.10.4-cp35-cp35m-linux_armv7l.whl",
                )
            },
            ArchiveLink::new(
                "tensorflow-2.0.0-cp37-cp37m-linux_x86_64.whl",
                "tensorflow-2.0.0-cp37-cp37m-linux_x86_64.whl",
            ),
        ]
    );
    Ok(())
}
